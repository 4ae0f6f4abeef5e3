pub mod options_panel;
