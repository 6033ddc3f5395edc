mod format;
mod theme;

pub use format::{format_currency, format_date, format_grouped_int};
pub use theme::{Role, Theme};

use tabled::{Table, Tabled};

use crate::config::DisplaySettings;
use crate::controller::{QueryController, ViewState};
use crate::ledger::{FilterState, PaymentRecord, SavingsType, SavingsTypeFilter, StatusFilter};

pub const EMPTY_MESSAGE: &str = "Tidak ada riwayat pembayaran yang ditemukan.";
pub const LOADING_MESSAGE: &str = "Memuat data riwayat pembayaran...";
pub const TOTAL_LABEL: &str = "Total Transaksi Sukses";

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ANGGOTA")]
    member: String,
    #[tabled(rename = "TANGGAL")]
    date: String,
    #[tabled(rename = "JUMLAH")]
    gross: String,
    #[tabled(rename = "BERSIH")]
    net: String,
    #[tabled(rename = "BIAYA ADMIN")]
    fee: String,
    #[tabled(rename = "JENIS SIMPANAN")]
    savings_type: String,
    #[tabled(rename = "METODE")]
    method: String,
    #[tabled(rename = "KETERANGAN")]
    note: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct SavingsTypeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "JENIS SIMPANAN")]
    name: String,
}

/// `method (bank)`, with QRIS standing in for payments that carry no bank
pub fn payment_method_label(record: &PaymentRecord) -> String {
    let method = record.payment_method.as_deref().unwrap_or("-");
    let bank = record.bank_name.as_deref().unwrap_or("QRIS");
    format!("{method} ({bank})")
}

pub fn status_badge(record: &PaymentRecord) -> String {
    if record.status.is_success() {
        format!("✔ {}", record.status)
    } else {
        format!("✘ {}", record.status)
    }
}

fn dash_if_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Renders the filtered ledger: filter summary, totals, and exactly one of
/// loading / error / empty / table.
pub struct LedgerView<'a> {
    display: &'a DisplaySettings,
    theme: Theme,
}

impl<'a> LedgerView<'a> {
    pub fn new(display: &'a DisplaySettings, theme: Theme) -> Self {
        Self { display, theme }
    }

    pub fn currency(&self, value: f64) -> String {
        format_currency(
            value,
            &self.display.currency_symbol,
            self.display.thousands_separator,
        )
    }

    pub fn render(&self, controller: &QueryController, savings_types: &[SavingsType]) -> String {
        let mut out = String::new();

        out.push_str(&self.theme.paint(Role::Heading, "Opsi Filter & Pencarian"));
        out.push('\n');
        out.push_str(&self.filter_summary(controller.filter(), savings_types));
        out.push_str("\n\n");

        if controller.filter().status == StatusFilter::Success && !controller.is_loading() {
            out.push_str(&self.totals_line(controller.total_success_amount()));
            out.push_str("\n\n");
        }

        out.push_str(&self.theme.paint(Role::Heading, "Riwayat Pembayaran"));
        out.push('\n');
        out.push_str(&self.body(controller.state()));
        out
    }

    fn filter_summary(&self, filter: &FilterState, savings_types: &[SavingsType]) -> String {
        let search = if filter.search_term.is_empty() {
            "-".to_string()
        } else {
            format!("\"{}\"", filter.search_term)
        };

        let savings = match &filter.savings_type {
            SavingsTypeFilter::All => "Semua Jenis Simpanan".to_string(),
            SavingsTypeFilter::Id(id) => savings_types
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.clone()),
        };

        self.theme.paint(
            Role::Muted,
            &format!(
                "  Cari: {} | Status: {} | Jenis Simpanan: {}",
                search,
                filter.status.label(),
                savings
            ),
        )
    }

    pub fn totals_line(&self, total: f64) -> String {
        self.theme.paint(
            Role::Positive,
            &format!("{}: {}", TOTAL_LABEL, self.currency(total)),
        )
    }

    fn body(&self, state: &ViewState) -> String {
        match state {
            ViewState::Idle => String::new(),
            ViewState::Loading => self.theme.paint(Role::Accent, LOADING_MESSAGE),
            ViewState::Failure(message) => self.theme.paint(Role::Negative, &format!("! {message}")),
            ViewState::Success(result) if result.records.is_empty() => {
                self.theme.paint(Role::Muted, EMPTY_MESSAGE)
            }
            ViewState::Success(result) => self.history_table(&result.records),
        }
    }

    pub fn history_table(&self, records: &[PaymentRecord]) -> String {
        let rows: Vec<HistoryRow> = records
            .iter()
            .map(|record| HistoryRow {
                member: record.member_name.clone(),
                date: format_date(&record.created_at, &self.display.date_format),
                gross: self.currency(record.gross_amount),
                net: self.currency(record.net()),
                fee: self.currency(record.fee()),
                savings_type: dash_if_empty(record.savings_type_name.as_deref()),
                method: payment_method_label(record),
                note: dash_if_empty(record.note.as_deref()),
                status: status_badge(record),
            })
            .collect();

        let mut table = Table::new(rows);
        self.theme.style_table(&mut table);
        table.to_string()
    }

    pub fn savings_types_table(&self, savings_types: &[SavingsType]) -> String {
        let rows: Vec<SavingsTypeRow> = savings_types
            .iter()
            .map(|s| SavingsTypeRow {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        self.theme.style_table(&mut table);
        table.to_string()
    }
}
