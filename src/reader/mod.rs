mod base;
mod chain;
mod objstm;
mod simple;
mod sweep;

pub use base::BaseReader;
pub use chain::build_table;
pub use objstm::ObjStm;
pub use simple::SimpleReader;
pub use sweep::Sweep;
