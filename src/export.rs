//! Spreadsheet export of successful payments.

use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::ledger::PaymentRecord;
use crate::view::{format_date, payment_method_label};

pub const DEFAULT_FILE_NAME: &str = "transaksi_sukses_koperasi.xlsx";
pub const SHEET_NAME: &str = "Transaksi Sukses";

pub const HEADERS: [&str; 8] = [
    "Anggota",
    "Tanggal",
    "Jumlah Dibayar",
    "Jumlah Bersih",
    "Biaya Admin",
    "Jenis Simpanan",
    "Metode Pembayaran",
    "Keterangan",
];

/// One exported spreadsheet row
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub member_name: String,
    pub date: String,
    pub gross_amount: f64,
    pub net_amount: f64,
    pub admin_fee: f64,
    pub savings_type_name: String,
    pub payment_method: String,
    pub note: String,
}

/// Successful records only, in load order
pub fn success_rows(records: &[PaymentRecord], date_format: &str) -> Vec<ExportRow> {
    records
        .iter()
        .filter(|r| r.status.is_success())
        .map(|r| ExportRow {
            member_name: r.member_name.clone(),
            date: format_date(&r.created_at, date_format),
            gross_amount: r.gross_amount,
            net_amount: r.net(),
            admin_fee: r.fee(),
            savings_type_name: r.savings_type_name.clone().unwrap_or_default(),
            payment_method: payment_method_label(r),
            note: r.note.clone().unwrap_or_default(),
        })
        .collect()
}

/// Write the successful subset of `records` to an .xlsx workbook at `path`.
/// Returns the number of data rows written.
pub fn export_successful_records(
    records: &[PaymentRecord],
    path: &Path,
    date_format: &str,
) -> Result<usize> {
    let rows = success_rows(records, date_format);

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        worksheet.write_string(r, 0, &row.member_name)?;
        worksheet.write_string(r, 1, &row.date)?;
        worksheet.write_number(r, 2, row.gross_amount)?;
        worksheet.write_number(r, 3, row.net_amount)?;
        worksheet.write_number(r, 4, row.admin_fee)?;
        worksheet.write_string(r, 5, &row.savings_type_name)?;
        worksheet.write_string(r, 6, &row.payment_method)?;
        worksheet.write_string(r, 7, &row.note)?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;

    info!(rows = rows.len(), path = %path.display(), "exported successful payments");
    Ok(rows.len())
}
