pub mod catalog_service;
pub mod interest_queue;
pub mod member_directory;
pub mod notifier;

#[allow(unused_imports)]
pub use catalog_service::CatalogService;
#[allow(unused_imports)]
pub use interest_queue::InterestQueue;
#[allow(unused_imports)]
pub use member_directory::MemberDirectory;
#[allow(unused_imports)]
pub use notifier::Notifier;
