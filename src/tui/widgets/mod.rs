pub mod board_view;
pub mod calendar_view;
pub mod card_form;
pub mod color;
pub mod confirm_delete;
pub mod diary_view;
pub mod editor;
pub mod help;
pub mod status_bar;
pub mod tabs;
