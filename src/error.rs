#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(test), derive(defmt::Format))]
pub enum Error {
    /// The tick source rejected the requested countdown
    Schedule,
}
