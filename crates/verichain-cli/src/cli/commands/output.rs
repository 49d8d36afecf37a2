//! Rendering of command results on stdout.

use serde::Serialize;
use verichain_client::{short, DocumentRecord};

use crate::cli::args::OutputFormat;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_records(records: &[DocumentRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Text => {
            for line in record_lines(records) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn record_lines(records: &[DocumentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let stored = record
                .stored_at()
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let tx = record.transaction_reference.as_deref().unwrap_or_default();
            format!(
                "{:<8} {:<16} {:<66} tx {}  {}",
                record.status_label(),
                stored,
                record.hash,
                short(tx, 12),
                record.name
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lines() {
        let mut revoked = DocumentRecord::new("contract.pdf", "cafe");
        revoked.revoked = true;
        revoked.timestamp = Some(0);
        revoked.transaction_reference = Some("0x0123456789abcdef".to_string());
        let records = vec![DocumentRecord::new("a.pdf", "beef"), revoked];

        let lines = record_lines(&records);

        assert!(lines[0].starts_with("Active   -"));
        assert!(lines[0].contains("tx -  a.pdf"));
        assert!(lines[1].starts_with("Revoked  1970-01-01 00:00"));
        assert!(lines[1].contains("tx 0x0123456789…  contract.pdf"));
    }
}
