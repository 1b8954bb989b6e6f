//! CSV record sink: one UTF-8 file per date with a fixed header row.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use crate::response::OrderRecord;

use super::error::PersistError;
use super::traits::RecordSink;

/// Column order is part of the sink's contract; downstream consumers key on
/// the header.
const HEADER: [&str; 7] = [
    "Order Date",
    "Appeal Number",
    "Assessment Year",
    "Case Status",
    "Parties",
    "Alpha Bench",
    "Order Link",
];

/// Record sink that writes `itat_orders_DD-MM-YYYY.csv` files.
pub struct CsvRecordSink {
    dir: PathBuf,
}

impl CsvRecordSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("itat_orders_{}.csv", date.format("%d-%m-%Y")))
    }
}

#[async_trait]
impl RecordSink for CsvRecordSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn write_records(
        &self,
        date: NaiveDate,
        records: &[OrderRecord],
    ) -> Result<PathBuf, PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|_| PersistError::DirectoryFailed {
                path: self.dir.clone(),
            })?;

        let mut contents = String::new();
        push_row(&mut contents, HEADER.iter().copied());

        for record in records {
            let order_date = record.order_date.format("%d/%m/%Y").to_string();
            push_row(
                &mut contents,
                [
                    order_date.as_str(),
                    record.appeal_number.as_str(),
                    record.assessment_year.as_str(),
                    record.case_status.as_str(),
                    record.parties.as_str(),
                    record.alpha_bench.as_str(),
                    record.order_link.as_str(),
                ]
                .into_iter(),
            );
        }

        let path = self.file_path(date);
        tokio::fs::write(&path, contents.as_bytes())
            .await
            .map_err(|source| PersistError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Wrote record file"
        );
        Ok(path)
    }
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Quote a field only when it needs it; embedded quotes are doubled.
fn escape_field(field: &str) -> String {
    let needs_quotes =
        field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
