pub mod output_store;
pub mod show_figure;
