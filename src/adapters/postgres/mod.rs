pub mod interest_queue;
pub mod item_repository;
pub mod loan_repository;

// パブリックに型を再エクスポート
pub use interest_queue::InterestQueue as PostgresInterestQueue;
pub use item_repository::ItemRepository as PostgresItemRepository;
pub use loan_repository::LoanRepository as PostgresLoanRepository;
