//! Engine configuration.

/// Configuration for the simulated schema engine.
///
/// These mirror the server variables that shape MySQL's DDL behavior:
/// the server character set, identifier case folding, and whether a failing
/// multi-operation ALTER leaves partial state behind.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Default character set for character columns with no explicit charset.
    ///
    /// Set this to the live server's charset when comparing runs. Left empty,
    /// character columns report an empty charset.
    pub charset_server: String,

    /// Fold database and table names to lower case, as MySQL does with
    /// `lower_case_table_names=1`.
    pub lower_case_table_names: bool,

    /// Restore the pre-statement catalog when one operation of a
    /// multi-operation ALTER fails. When off, operations that already applied
    /// are kept, like a non-transactional server.
    pub need_atomic: bool,
}
