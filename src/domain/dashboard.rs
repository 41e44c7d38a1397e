// Per-installation dashboard aggregate
use super::chart::ChartSpec;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub installation_id: String,
    pub title: String,
    pub charts: Vec<ChartSpec>,
    /// Localized "no data" notices scoped to chart areas that could not be
    /// built; never a failure of the whole dashboard.
    pub notices: Vec<String>,
}

impl Dashboard {
    pub fn new(
        installation_id: String,
        title: String,
        charts: Vec<ChartSpec>,
        notices: Vec<String>,
    ) -> Self {
        Self {
            installation_id,
            title,
            charts,
            notices,
        }
    }
}
