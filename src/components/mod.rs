//! UI Components
//!
//! Leptos components of the grocery list page.

mod add_grocery_item;
mod error_banner;
mod grocery_edit_modal;
mod grocery_form;
mod grocery_header;
mod grocery_list;
mod log_panel;
mod row_actions_menu;
mod user_avatar;

pub use add_grocery_item::AddGroceryItem;
pub use error_banner::ErrorBanner;
pub use grocery_edit_modal::GroceryEditModal;
pub use grocery_form::GroceryForm;
pub use grocery_header::GroceryHeader;
pub use grocery_list::GroceryList;
pub use log_panel::LogPanel;
pub use row_actions_menu::RowActionsMenu;
pub use user_avatar::UserAvatar;
