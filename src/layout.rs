pub(crate) mod contact_sheet;
pub(crate) mod fit;
pub(crate) mod grid;
