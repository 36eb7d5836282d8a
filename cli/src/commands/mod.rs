mod alerts;
mod energy;
mod helpers;
mod summary;

pub(crate) use alerts::cmd_alerts;
pub(crate) use energy::cmd_energy;
pub(crate) use helpers::build_clock;
pub(crate) use summary::cmd_summary;
