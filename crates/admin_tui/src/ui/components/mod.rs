pub mod bulk_bar;
pub mod data_table;
pub mod dialog;
pub mod filter_bar;
pub mod hints;
pub mod pagination;
pub mod tabs;
pub mod toast;
