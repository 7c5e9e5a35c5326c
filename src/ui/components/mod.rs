pub mod results_list;
pub mod text_field;
