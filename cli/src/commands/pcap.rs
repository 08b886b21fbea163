//! Pcap query commands

use super::ApiClient;
use crate::{output::OutputFormat, PcapCommands};
use rampart_triage::pcap::PcapRequest;

pub async fn handle(
    action: PcapCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        PcapCommands::Submit {
            start,
            end,
            ip_src_addr,
            ip_src_port,
            ip_dst_addr,
            ip_dst_port,
            protocol,
            filter,
            include_reverse,
        } => {
            // Validation happens here, before any HTTP call.
            let request = PcapRequest::for_range(start.as_deref(), end.as_deref())?
                .with_src(ip_src_addr, ip_src_port)
                .with_dst(ip_dst_addr, ip_dst_port)
                .with_protocol(protocol)
                .with_packet_filter(filter)
                .with_include_reverse(include_reverse);

            let job = client.submit_pcap(&request).await?;
            println!("submitted pcap job {}", job.job_id);
            format.print(&job);
        }
        PcapCommands::Status { job_id } => {
            let job = client.pcap_status(&job_id).await?;
            format.print(&job);
        }
    }
    Ok(())
}
