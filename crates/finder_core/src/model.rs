pub type SourceId = i64;
pub type OfferId = i64;

/// A point site through which offers are redeemed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
}

impl Source {
    pub fn new(id: SourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A cashback offer as returned by the offer store, already joined to its source name.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub reward_value: f64,
    /// Comma separated device codes, e.g. `p,i,a`. Empty means every device.
    pub devices: String,
    pub source_name: String,
}
