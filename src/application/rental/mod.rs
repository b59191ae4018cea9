mod dispatch;
mod errors;
mod loan_service;
mod reservation_service;

#[allow(unused_imports)]
pub use dispatch::{DispatchError, DispatchReport, dispatch_item_available};
#[allow(unused_imports)]
pub use errors::{RentalError, Result};
#[allow(unused_imports)]
pub use loan_service::{
    ServiceDependencies, activate_loan, decline_loan, request_loan, return_loan,
};
#[allow(unused_imports)]
pub use reservation_service::{catalog_has_available_item, register_interest, withdraw_interest};
