pub mod panel_watcher;
