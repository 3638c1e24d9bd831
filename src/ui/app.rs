//! Main browser application using eframe/egui

use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use eframe::egui;

use super::panels::{self, PanelAction, PanelState};
use super::{Theme, UiConfig};
use crate::answer::Answer;
use crate::app::{AppContext, Submission};
use crate::config::AppConfig;
use crate::ledger::DebouncedField;
use crate::omnibox::{AUTOCOMPLETE_SUGGESTIONS, suggestions};
use crate::session::{ActiveView, SearchTicket, TabDisplay, TabId};
use crate::storage::FontSize;
use crate::ticker::PROGRESS_INTERVAL;
use crate::utils::{AnswerError, Result};

type SearchOutcome = (SearchTicket, Result<Answer>);

/// Main browser application
pub struct BrowserApp {
    /// UI configuration
    config: UiConfig,
    app: AppContext,
    /// Omnibox text with debounced undo history
    omnibox: DebouncedField,
    /// Tab the omnibox history belongs to
    omnibox_tab: TabId,
    omnibox_focused: bool,
    suggestions_hovered: bool,
    panels: PanelState,
    runtime: tokio::runtime::Runtime,
    results_tx: Sender<SearchOutcome>,
    results_rx: Receiver<SearchOutcome>,
    shut_down: bool,
}

impl BrowserApp {
    /// Create a new browser application
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        app: AppContext,
        config: UiConfig,
        quiet_period: Duration,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (results_tx, results_rx) = channel();
        let omnibox_tab = app.session().active_tab_id();

        Ok(Self {
            config,
            app,
            omnibox: DebouncedField::with_quiet_period("", quiet_period),
            omnibox_tab,
            omnibox_focused: false,
            suggestions_hovered: false,
            panels: PanelState::default(),
            runtime,
            results_tx,
            results_rx,
            shut_down: false,
        })
    }

    /// Submit the omnibox value (or a clicked suggestion)
    fn submit(&mut self, ctx: &egui::Context, input: &str) {
        self.omnibox.commit_value(input);
        if let Some(Submission::Search(ticket)) = self.app.submit(input) {
            self.spawn_search(ctx, ticket);
        }
    }

    fn spawn_search(&self, ctx: &egui::Context, ticket: SearchTicket) {
        let service = self.app.answer_service();
        let tx = self.results_tx.clone();
        let repaint = ctx.clone();
        self.runtime.spawn(async move {
            let result = service.answer(&ticket.query).await;
            if tx.send((ticket, result)).is_err() {
                log::debug!("Search finished after the window closed");
            }
            repaint.request_repaint();
        });
    }

    /// Apply answers that arrived since the last frame
    fn poll_results(&mut self) {
        while let Ok((ticket, result)) = self.results_rx.try_recv() {
            if !self.app.resolve(&ticket, result) {
                log::debug!("Dropped stale answer for {:?}", ticket.query);
            }
        }
    }

    /// Rebind the omnibox when another tab became active
    fn sync_omnibox(&mut self) {
        let active = self.app.session().active_tab_id();
        if active != self.omnibox_tab {
            self.omnibox_tab = active;
            let value = self
                .app
                .session()
                .active_tab()
                .map(|tab| tab.input_value().to_string())
                .unwrap_or_default();
            self.omnibox.rebind(value);
        }
    }

    fn apply_style(&self, ctx: &egui::Context) {
        let settings = self.app.settings().get();

        let mut visuals = match self.config.theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
            Theme::System => ctx.style().visuals.clone(),
        };
        if settings.high_contrast {
            visuals = egui::Visuals::dark();
            visuals.override_text_color = Some(egui::Color32::WHITE);
            visuals.panel_fill = egui::Color32::BLACK;
            visuals.window_fill = egui::Color32::BLACK;
            visuals.hyperlink_color = egui::Color32::YELLOW;
        }
        ctx.set_visuals(visuals);

        let zoom = zoom_factor(settings.font_size);
        if (ctx.zoom_factor() - zoom).abs() > f32::EPSILON {
            ctx.set_zoom_factor(zoom);
        }
        let reduce_motion = settings.reduce_motion;
        ctx.style_mut(|style| {
            style.animation_time = if reduce_motion { 0.0 } else { 1.0 / 12.0 };
        });
    }

    /// Route Ctrl+Z / Ctrl+Shift+Z / Ctrl+Y to the omnibox history before the
    /// text widget sees them
    fn handle_history_keys(&mut self, ctx: &egui::Context) {
        if !self.omnibox_focused {
            return;
        }
        let (redo_shift, redo_y, undo) = ctx.input_mut(|i| {
            let redo_shift = i.consume_key(
                egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
                egui::Key::Z,
            );
            let redo_y = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y);
            let undo = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z);
            (redo_shift, redo_y, undo)
        });
        if redo_shift || redo_y {
            self.omnibox.redo();
        } else if undo {
            self.omnibox.undo();
        }
    }

    /// Render the header: logo, omnibox, bookmark star, settings
    fn render_header(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let mut submitted = None;

        ui.horizontal(|ui| {
            if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                self.app.toggle_sidebar();
            }
            if ui
                .add(egui::Button::new(egui::RichText::new("Answer").strong()))
                .on_hover_text("Home")
                .clicked()
            {
                self.app.session_mut().clear_active_tab();
                self.omnibox.rebind("");
            }

            let engine = self.app.settings().get().search_engine;
            let response = ui.add(
                egui::TextEdit::singleline(self.omnibox.buffer_mut())
                    .id(egui::Id::new("omnibox"))
                    .desired_width(ui.available_width() - 80.0)
                    .hint_text(format!("Ask anything or enter a URL ({})", engine)),
            );
            let now = Instant::now();
            if response.changed() {
                self.omnibox.touch(now);
            }
            if response.lost_focus() {
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submitted = Some(self.omnibox.value().to_string());
                } else {
                    self.omnibox.commit();
                }
            }
            self.omnibox.tick(now);
            self.omnibox_focused = response.has_focus();

            let starred = self.app.is_current_page_bookmarked();
            let star = if starred { "★" } else { "☆" };
            if ui.button(star).on_hover_text("Bookmark this page").clicked() {
                self.app.toggle_bookmark();
            }
            if ui.button("⚙").on_hover_text("Settings").clicked() {
                self.app.session_mut().open_settings_modal();
            }
        });

        // Stay open while the pointer is over the list so a click can land.
        if self.omnibox_focused || self.suggestions_hovered {
            let list = ui.scope(|ui| {
                for suggestion in suggestions(self.omnibox.value()) {
                    if ui.selectable_label(false, suggestion).clicked() {
                        submitted = Some(suggestion.to_string());
                    }
                }
            });
            self.suggestions_hovered = list.response.contains_pointer();
        } else {
            self.suggestions_hovered = false;
        }

        if let Some(input) = submitted {
            self.submit(&ctx, &input);
        }
    }

    /// Render the tab bar
    fn render_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let tabs: Vec<_> = self
                .app
                .session()
                .tabs()
                .iter()
                .map(|t| (t.id(), t.title().to_string(), t.is_searching()))
                .collect();
            let count = tabs.len();
            let active = self.app.session().active_tab_id();
            let mut dropped = None;

            for (position, (id, title, searching)) in tabs.into_iter().enumerate() {
                let is_active = active == id;
                let mut text = truncate_title(&title, self.config.max_tab_title);
                if searching {
                    text.insert_str(0, "⏳ ");
                }

                let button = egui::Button::new(text).fill(if is_active {
                    ui.style().visuals.selection.bg_fill
                } else {
                    ui.style().visuals.widgets.inactive.bg_fill
                });

                let response = ui
                    .add(button.sense(egui::Sense::click_and_drag()))
                    .on_hover_text(&title);
                if response.clicked() {
                    self.app.session_mut().set_active_tab(id);
                }
                response.dnd_set_drag_payload(position);
                if let Some(from) = response.dnd_release_payload::<usize>() {
                    dropped = Some((*from, position));
                }
                response.context_menu(|ui| {
                    if position > 0 && ui.button("Move left").clicked() {
                        self.app.session_mut().move_tab(position, position - 1);
                        ui.close();
                    }
                    if position + 1 < count && ui.button("Move right").clicked() {
                        self.app.session_mut().move_tab(position, position + 1);
                        ui.close();
                    }
                    if ui.button("Close").clicked() {
                        self.app.remove_tab(id);
                        ui.close();
                    }
                });

                if ui.small_button("×").clicked() {
                    self.app.remove_tab(id);
                }

                ui.separator();
            }

            if ui.button("+").on_hover_text("New tab").clicked() {
                self.app.add_tab();
            }

            if let Some((from, to)) = dropped {
                self.app.session_mut().move_tab(from, to);
            }
        });
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        let current = self.app.session().active_view();
        ui.vertical(|ui| {
            for view in ActiveView::PANELS {
                if ui.selectable_label(current == view, view.label()).clicked() {
                    self.app.set_active_view(view);
                }
            }
        });
    }

    /// Render the content area
    fn render_content(&mut self, ui: &mut egui::Ui) {
        let action = match self.app.session().active_view() {
            ActiveView::Tabs => {
                self.render_tab_content(ui);
                None
            }
            ActiveView::Bookmarks => panels::bookmarks(ui, &mut self.app, &mut self.panels),
            ActiveView::History => panels::history(ui, &mut self.app, &mut self.panels),
            ActiveView::Downloads => {
                panels::downloads(ui, &mut self.app);
                None
            }
            ActiveView::Extensions => {
                panels::extensions(ui);
                None
            }
        };

        if let Some(PanelAction::Open(url)) = action {
            self.submit(&ui.ctx().clone(), &url);
        }
    }

    fn render_tab_content(&mut self, ui: &mut egui::Ui) {
        let blank = self.app.session().active_tab().is_none_or(|tab| tab.is_blank());
        if blank {
            self.render_new_tab_page(ui);
            return;
        }
        let Some(tab) = self.app.session().active_tab() else {
            return;
        };

        let mut follow_up = None;
        match tab.display() {
            TabDisplay::Blank => {}
            TabDisplay::Searching { query, .. } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.spinner();
                    ui.label(format!("Searching for \"{}\"...", query));
                });
            }
            TabDisplay::Failed { error, .. } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.colored_label(ui.visuals().error_fg_color, error);
                });
            }
            TabDisplay::Navigating { url } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.heading("Navigation");
                    ui.label("Pages are not rendered in this browser.");
                    ui.hyperlink_to(url, url);
                });
            }
            TabDisplay::Answered { query, answer } => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading(query);
                    ui.add_space(8.0);
                    ui.label(&answer.text);

                    if !answer.sources.is_empty() {
                        ui.add_space(12.0);
                        ui.strong("Sources");
                        for (i, source) in answer.sources.iter().enumerate() {
                            ui.horizontal(|ui| {
                                ui.label(format!("[{}]", i + 1));
                                ui.hyperlink_to(&source.title, &source.uri);
                            });
                        }
                    }

                    if !answer.related_searches.is_empty() {
                        ui.add_space(12.0);
                        ui.strong("Related searches");
                        for related in &answer.related_searches {
                            if ui.link(related).clicked() {
                                follow_up = Some(related.clone());
                            }
                        }
                    }
                });
            }
        }

        if let Some(query) = follow_up {
            self.submit(&ui.ctx().clone(), &query);
        }
    }

    /// Render new tab page
    fn render_new_tab_page(&mut self, ui: &mut egui::Ui) {
        let mut picked = None;
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.heading("Answer Browser");
            ui.add_space(20.0);
            ui.label("Ask a question or enter a URL above");
            ui.add_space(40.0);

            for suggestion in AUTOCOMPLETE_SUGGESTIONS.iter().take(4) {
                if ui.button(*suggestion).clicked() {
                    picked = Some(*suggestion);
                }
            }
        });
        if let Some(query) = picked {
            self.submit(&ui.ctx().clone(), query);
        }
    }
}

impl eframe::App for BrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();
        let report = self.app.tick_downloads(Instant::now());
        if let Some(id) = report.spawned {
            log::debug!("Mock download {} started", id);
        }

        self.sync_omnibox();
        self.apply_style(ctx);
        self.handle_history_keys(ctx);
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::L)) {
            ctx.memory_mut(|m| m.request_focus(egui::Id::new("omnibox")));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.render_header(ui);
        });

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            self.render_tab_bar(ui);
        });

        if !self.app.session().is_sidebar_collapsed() {
            egui::SidePanel::left("sidebar")
                .resizable(false)
                .exact_width(140.0)
                .show(ctx, |ui| {
                    self.render_sidebar(ui);
                });
        }

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_content(ui);
        });

        // Settings window
        if self.app.session().is_settings_open() {
            panels::settings(ctx, &mut self.app);
        }

        // The omnibox may have switched tabs or been edited this frame.
        self.sync_omnibox();

        if ctx.input(|i| i.viewport().close_requested()) && !self.shut_down {
            self.app.shutdown();
            self.shut_down = true;
        }

        // Keep ticking downloads and the omnibox debounce while idle.
        let wake = if self.omnibox.has_pending_edit() {
            Duration::from_millis(100)
        } else {
            PROGRESS_INTERVAL
        };
        ctx.request_repaint_after(wake);
    }
}

/// Zoom that scales the default body text to the chosen size
fn zoom_factor(size: FontSize) -> f32 {
    size.points() / FontSize::Medium.points()
}

/// Shorten a title to `max` characters, ending in an ellipsis
fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let kept: String = title.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Run the browser application
pub fn run(config: AppConfig) -> Result<()> {
    let app = AppContext::from_config(&config)?;
    let ui_config = UiConfig::default();
    let quiet_period = config.history_quiet_period;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                ui_config.window_width as f32,
                ui_config.window_height as f32,
            ])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Answer Browser"),
        ..Default::default()
    };

    eframe::run_native(
        "Answer Browser",
        options,
        Box::new(move |cc| {
            Ok(Box::new(BrowserApp::new(cc, app, ui_config, quiet_period)?))
        }),
    )
    .map_err(|e| AnswerError::Other(format!("Failed to start browser: {}", e)))
}
