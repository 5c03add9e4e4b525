pub mod api_contact;
pub mod contact_row;
pub mod contact_summary;
