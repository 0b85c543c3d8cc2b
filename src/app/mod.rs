use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::Utc;
use eframe::egui::{self, Context, Vec2};
use uuid::Uuid;

use crate::data::{load_snapshot, Interaction, InteractionType, Person, RelationshipType, Snapshot};
use crate::graph::{apply_highlight, build_graph_data_with, GraphData};
use crate::parse::{compute_sentiment, parse_log_entry, ParsedLogEntry};

mod panels;
mod render_utils;
mod view;

pub struct SocialqApp {
    data_path: PathBuf,
    iterations: usize,
    state: AppState,
    reload_rx: Option<Receiver<Result<Snapshot, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Snapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    snapshot: Snapshot,
    iterations: usize,
    search: String,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    base_graph: GraphData,
    display_graph: GraphData,
    graph_dirty: bool,
    unsaved_changes: bool,
    last_error: Option<String>,
    composer: ComposerState,
}

#[derive(Default)]
struct ComposerState {
    text: String,
    parsed_for: Option<String>,
    parsed: Option<ParsedLogEntry>,
    // Person ids picked by the user to resolve ambiguous first names.
    pinned_people: Vec<String>,
}

impl SocialqApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf, iterations: usize) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            iterations,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<Snapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_snapshot(&data_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for SocialqApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => {
                            AppState::Ready(Box::new(ViewModel::new(snapshot, self.iterations)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relationship data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(snapshot) => AppState::Ready(Box::new(ViewModel::new(
                                    snapshot,
                                    self.iterations,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn rebuild_graph(&mut self) {
        self.base_graph = build_graph_data_with(
            &self.snapshot.people,
            &self.snapshot.interactions,
            self.iterations,
        );
        self.graph_dirty = false;
        self.refresh_highlight();
    }

    fn refresh_highlight(&mut self) {
        self.display_graph = apply_highlight(
            self.base_graph.nodes.clone(),
            self.base_graph.edges.clone(),
            self.selected.as_deref(),
        );
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        self.refresh_highlight();
    }

    fn ensure_composer_parsed(&mut self) {
        if self.composer.parsed_for.as_deref() == Some(self.composer.text.as_str()) {
            return;
        }
        self.composer.parsed = Some(parse_log_entry(&self.composer.text, &self.snapshot.people));
        self.composer.parsed_for = Some(self.composer.text.clone());
        self.composer
            .pinned_people
            .retain(|id| self.snapshot.person(id).is_some());
    }

    fn toggle_pinned_person(&mut self, person_id: String) {
        if let Some(position) = self
            .composer
            .pinned_people
            .iter()
            .position(|id| *id == person_id)
        {
            self.composer.pinned_people.remove(position);
        } else {
            self.composer.pinned_people.push(person_id);
        }
    }

    fn add_person_named(&mut self, name: &str) {
        self.snapshot.people.push(Person {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            nickname: None,
            relationship_type: RelationshipType::Acquaintance,
            closeness_level: 1,
            notes: None,
            birthday: None,
            last_interaction_at: None,
        });
        // Re-parse so the new contact matches instead of listing as unknown.
        self.composer.parsed_for = None;
        self.graph_dirty = true;
        self.unsaved_changes = true;
    }

    fn submit_composer(&mut self) {
        let Some(parsed) = self.composer.parsed.clone() else {
            return;
        };
        if parsed.notes.is_empty() {
            return;
        }

        let mut people = parsed.matched_people.clone();
        for id in &self.composer.pinned_people {
            if let Some(person) = self.snapshot.person(id)
                && people.iter().all(|existing| existing.id != person.id)
            {
                people.push(person.clone());
            }
        }

        let occurred_at = parsed.occurred_at.with_timezone(&Utc);
        let interaction = Interaction {
            id: Uuid::new_v4().to_string(),
            kind: parsed.inferred_type.unwrap_or(InteractionType::InPerson),
            title: if parsed.title.is_empty() {
                "Logged interaction".to_owned()
            } else {
                parsed.title.clone()
            },
            notes: Some(parsed.notes.clone()),
            sentiment: compute_sentiment(&parsed.notes),
            location: parsed.location.clone(),
            occurred_at,
            people,
        };

        for person in &mut self.snapshot.people {
            if interaction
                .people
                .iter()
                .any(|participant| participant.id == person.id)
            {
                person.last_interaction_at = Some(match person.last_interaction_at {
                    Some(previous) => previous.max(occurred_at),
                    None => occurred_at,
                });
            }
        }

        self.snapshot.interactions.push(interaction);
        self.composer = ComposerState::default();
        self.graph_dirty = true;
        self.unsaved_changes = true;
    }
}
