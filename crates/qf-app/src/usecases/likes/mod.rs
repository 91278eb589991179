mod synchronizer;

pub use synchronizer::{BulkUnlikeReport, LikeSyncError, LikeSynchronizer};
