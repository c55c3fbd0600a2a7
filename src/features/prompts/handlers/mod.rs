pub mod prompt_handler;

pub use prompt_handler::{
    __path_get_template, __path_list_templates, __path_reset_all_templates,
    __path_reset_template, __path_update_template, get_template, list_templates,
    reset_all_templates, reset_template, resolve_category, update_template,
};
