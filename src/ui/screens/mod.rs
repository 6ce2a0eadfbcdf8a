pub(crate) mod add_form;
pub(crate) mod dashboard;
pub(crate) mod transactions;
