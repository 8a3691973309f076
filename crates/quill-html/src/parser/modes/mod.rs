//! Per-insertion-mode token handlers, grouped by phase of the document.

mod after_body;
mod before_body;
mod in_body;
mod in_select;
mod in_table;
mod in_template;
