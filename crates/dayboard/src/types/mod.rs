mod category;
mod partition;

pub use category::Category;
pub use partition::{KeyPrefix, Structure, NAMESPACE};
