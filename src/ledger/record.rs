use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;

/// Payment status as reported by the API
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    #[serde(rename = "SUKSES", alias = "SUCCESS")]
    Success,
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "FAILED", alias = "GAGAL")]
    Failed,
}

impl PaymentStatus {
    pub fn is_success(self) -> bool {
        self == PaymentStatus::Success
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Success => "SUKSES",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// A savings type ("jenis simpanan") offered by the cooperative
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SavingsType {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "nama_simpanan")]
    pub name: String,
}

/// A single member payment from the history endpoint
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaymentRecord {
    #[serde(rename = "id_pembayaran", default, deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "nama_anggota")]
    pub member_name: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: NaiveDateTime,
    /// Amount paid by the member, before the admin fee
    #[serde(rename = "jumlah", deserialize_with = "de_amount")]
    pub gross_amount: f64,
    #[serde(rename = "jumlah_bersih", default, deserialize_with = "de_opt_amount")]
    pub net_amount: Option<f64>,
    #[serde(rename = "biaya_admin", default, deserialize_with = "de_opt_amount")]
    pub admin_fee: Option<f64>,
    #[serde(rename = "jenis_simpanan", default)]
    pub savings_type_name: Option<String>,
    #[serde(rename = "jenis_pembayaran", default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(rename = "keterangan", default)]
    pub note: Option<String>,
    #[serde(rename = "status_pembayaran")]
    pub status: PaymentStatus,
}

impl PaymentRecord {
    pub fn fee(&self) -> f64 {
        self.admin_fee.unwrap_or(0.0)
    }

    /// Net amount credited to savings; derived from gross minus fee when the
    /// API omits it.
    pub fn net(&self) -> f64 {
        self.net_amount.unwrap_or(self.gross_amount - self.fee())
    }
}

/// One resolved history fetch. The total is the server's aggregate and is
/// never recomputed from `records`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ReportResult {
    #[serde(rename = "history")]
    pub records: Vec<PaymentRecord>,
    #[serde(rename = "total_nominal", default, deserialize_with = "de_total")]
    pub total_success_amount: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Integer(n) => Ok(n.to_string()),
        NumberOrText::Float(n) => Ok(n.to_string()),
        NumberOrText::Text(s) => Ok(s),
    }
}

fn parse_amount<E: de::Error>(value: NumberOrText) -> Result<f64, E> {
    match value {
        NumberOrText::Integer(n) => Ok(n as f64),
        NumberOrText::Float(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid amount '{s}'"))),
    }
}

fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_amount(NumberOrText::deserialize(deserializer)?)
}

fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(parse_amount::<D::Error>)
        .transpose()
}

fn de_total<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_amount(deserializer)?.unwrap_or(0.0))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates. Offsets are kept
/// as wall-clock time in the offset they were sent with.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
