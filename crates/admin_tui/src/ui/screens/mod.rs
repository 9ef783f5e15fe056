pub mod list_page;
