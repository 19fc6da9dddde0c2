pub mod color;
pub mod confirm_delete;
pub mod help;
pub mod input;
pub mod plan_view;
pub mod stats_panel;
pub mod status_bar;
pub mod tabs;
pub mod task_form;
pub mod task_list;
