#[allow(unused_imports)]
pub mod catalog_service;
#[allow(unused_imports)]
pub mod interest_queue;
#[allow(unused_imports)]
pub mod item_repository;
#[allow(unused_imports)]
pub mod loan_repository;
#[allow(unused_imports)]
pub mod member_directory;
#[allow(unused_imports)]
pub mod notifier;

#[allow(unused_imports)]
pub use catalog_service::*;
#[allow(unused_imports)]
pub use interest_queue::*;
#[allow(unused_imports)]
pub use item_repository::*;
#[allow(unused_imports)]
pub use loan_repository::*;
#[allow(unused_imports)]
pub use member_directory::*;
#[allow(unused_imports)]
pub use notifier::*;
