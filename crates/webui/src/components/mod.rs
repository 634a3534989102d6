pub mod not_found;
pub mod notice;
pub mod todo_item;
pub mod todo_list_page;
