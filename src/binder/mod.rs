//! Contract binding for shapebind
//!
//! The integration point: operations declare their request/response
//! schemas once, immutably (C4), and both runtime validation and
//! published documentation derive from that single declaration.

mod registry;

pub use registry::{ContractBinder, ContractBinding, OperationDoc, OperationShapes};
