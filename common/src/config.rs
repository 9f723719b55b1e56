use std::time::Duration;

pub struct Config {
    /// Hard deadline applied to every single phase of every target.
    ///
    /// This is a per-operation budget, not a whole-run budget.
    pub timeout: Duration,
    /// Emit one machine-readable JSON document instead of the table.
    pub json: bool,
    /// Suppresses the startup banner and header.
    pub no_banner: bool,
}
