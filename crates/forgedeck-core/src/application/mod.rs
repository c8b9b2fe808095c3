pub mod bulk;

pub use bulk::{
    BulkService,
    RunHandle,
    RunId,
};
