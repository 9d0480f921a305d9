use std::time::Duration;

pub trait Algorithm {
    fn version(&self) -> u32;
    fn name(&self) -> String;
    fn parameters(&self) -> String;
    /// How long the run spent growing the kernel set (first element)
    /// and stabilizing it (second element)
    fn time_profile(&self) -> (Duration, Duration);
    /// Number of distance evaluations and of growth steps
    fn counters(&self) -> (u64, u64);
}
