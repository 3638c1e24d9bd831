//! Side panels and the settings window

use chrono::Local;
use eframe::egui;

use crate::app::AppContext;
use crate::storage::{DownloadStatus, FontSize, SearchEngine, group_by_day};

/// Something a panel asks the browser to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PanelAction {
    /// Navigate the active tab to a url
    Open(String),
}

/// Per-panel widget state that outlives a frame
#[derive(Debug, Default)]
pub(super) struct PanelState {
    bookmark_query: String,
    history_query: String,
    /// Bookmark id and comma-separated tags being edited
    tag_draft: Option<(String, String)>,
}

pub(super) fn bookmarks(
    ui: &mut egui::Ui,
    app: &mut AppContext,
    state: &mut PanelState,
) -> Option<PanelAction> {
    let mut action = None;
    let mut remove = None;
    let mut save_tags = None;

    ui.heading("Bookmarks");
    ui.add(
        egui::TextEdit::singleline(&mut state.bookmark_query)
            .hint_text("Search bookmarks or tags"),
    );
    ui.separator();

    let found = app.bookmarks().search(&state.bookmark_query);
    if found.is_empty() {
        ui.weak("No bookmarks yet.");
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for bookmark in found {
            ui.horizontal(|ui| {
                if ui.link(&bookmark.title).on_hover_text(&bookmark.url).clicked() {
                    action = Some(PanelAction::Open(bookmark.url.clone()));
                }
                if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                    remove = Some(bookmark.id.clone());
                }
                if ui.small_button("🏷").on_hover_text("Edit tags").clicked() {
                    state.tag_draft = Some((bookmark.id.clone(), bookmark.tags.join(", ")));
                }
            });

            match &mut state.tag_draft {
                Some((id, draft)) if *id == bookmark.id => {
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(draft);
                        if ui.button("Save").clicked() {
                            save_tags = Some((id.clone(), parse_tags(draft)));
                        }
                    });
                }
                _ if !bookmark.tags.is_empty() => {
                    ui.weak(bookmark.tags.join(" · "));
                }
                _ => {}
            }
        }
    });

    if let Some(id) = remove {
        app.bookmarks_mut().remove(&id);
    }
    if let Some((id, tags)) = save_tags {
        app.bookmarks_mut().update_tags(&id, tags);
        state.tag_draft = None;
    }
    action
}

pub(super) fn history(
    ui: &mut egui::Ui,
    app: &mut AppContext,
    state: &mut PanelState,
) -> Option<PanelAction> {
    let mut action = None;
    let mut remove = None;
    let mut clear = false;

    ui.horizontal(|ui| {
        ui.heading("History");
        if !app.history().is_empty() && ui.button("Clear all").clicked() {
            clear = true;
        }
    });
    ui.add(egui::TextEdit::singleline(&mut state.history_query).hint_text("Search history"));
    ui.separator();

    let found = app.history().search(&state.history_query);
    if found.is_empty() {
        ui.weak("Nothing here.");
    }

    let groups = group_by_day(&found, Local::now().date_naive());
    egui::ScrollArea::vertical().show(ui, |ui| {
        for group in groups {
            ui.strong(&group.label);
            for item in group.items {
                ui.horizontal(|ui| {
                    if ui.link(&item.title).on_hover_text(&item.url).clicked() {
                        action = Some(PanelAction::Open(item.url.clone()));
                    }
                    if ui.small_button("×").clicked() {
                        remove = Some(item.id.clone());
                    }
                });
            }
            ui.add_space(6.0);
        }
    });

    if let Some(id) = remove {
        app.history_mut().remove(&id);
    }
    if clear {
        app.history_mut().clear();
    }
    action
}

pub(super) fn downloads(ui: &mut egui::Ui, app: &mut AppContext) {
    let mut cancel = None;
    let mut remove = None;
    let mut clear = false;

    ui.horizontal(|ui| {
        ui.heading("Downloads");
        if app.downloads().completed_count() > 0 && ui.button("Clear").clicked() {
            clear = true;
        }
    });
    ui.separator();

    if app.downloads().all().is_empty() {
        ui.weak("No downloads.");
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in app.downloads().sorted() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(&item.file_name);
                    ui.weak(&item.size);
                });
                match item.status {
                    DownloadStatus::InProgress => {
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::ProgressBar::new((item.progress / 100.0) as f32)
                                    .show_percentage(),
                            );
                            if ui.small_button("Cancel").clicked() {
                                cancel = Some(item.id.clone());
                            }
                        });
                    }
                    status => {
                        ui.horizontal(|ui| {
                            ui.label(status.to_string());
                            if ui.small_button("Remove").clicked() {
                                remove = Some(item.id.clone());
                            }
                        });
                    }
                }
            });
        }
    });

    if let Some(id) = cancel {
        app.downloads_mut().cancel(&id);
    }
    if let Some(id) = remove {
        app.downloads_mut().remove(&id);
    }
    if clear {
        app.downloads_mut().clear();
    }
}

pub(super) fn extensions(ui: &mut egui::Ui) {
    ui.heading("Extensions");
    ui.separator();
    ui.weak("Extensions are not supported yet.");
}

/// Settings window; edits go straight to the persisted settings
pub(super) fn settings(ctx: &egui::Context, app: &mut AppContext) {
    let mut open = app.session().is_settings_open();
    let mut current = app.settings().get().clone();

    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Search");
            egui::ComboBox::from_label("Search engine")
                .selected_text(current.search_engine.to_string())
                .show_ui(ui, |ui| {
                    for engine in SearchEngine::ALL {
                        ui.selectable_value(&mut current.search_engine, engine, engine.to_string());
                    }
                });

            ui.add_space(10.0);
            ui.heading("Privacy");
            ui.checkbox(&mut current.block_trackers, "Block trackers");
            ui.checkbox(&mut current.clear_history_on_exit, "Clear history on exit");

            ui.add_space(10.0);
            ui.heading("Accessibility");
            ui.horizontal(|ui| {
                ui.label("Font size:");
                for size in FontSize::ALL {
                    ui.selectable_value(&mut current.font_size, size, size.to_string());
                }
            });
            ui.checkbox(&mut current.high_contrast, "High contrast");
            ui.checkbox(&mut current.enable_sound_cues, "Sound cues");
            ui.checkbox(&mut current.reduce_motion, "Reduce motion");
        });

    let settings = app.settings_mut();
    settings.set_search_engine(current.search_engine);
    settings.set_block_trackers(current.block_trackers);
    settings.set_clear_history_on_exit(current.clear_history_on_exit);
    settings.set_font_size(current.font_size);
    settings.set_high_contrast(current.high_contrast);
    settings.set_enable_sound_cues(current.enable_sound_cues);
    settings.set_reduce_motion(current.reduce_motion);

    if !open {
        app.session_mut().close_settings_modal();
    }
}

/// Split a comma-separated tag list, dropping blanks
fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" rust, , docs ,"), vec!["rust", "docs"]);
        assert!(parse_tags("").is_empty());
    }
}
