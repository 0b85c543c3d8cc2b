use std::path::Path;

use chrono::Utc;
use eframe::egui::{self, Align, Color32, Context, Layout, RichText, TextEdit, Ui, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::data::{
    closeness_label, save_snapshot, sentiment_color, sentiment_label, Person, Snapshot,
};
use crate::graph::GraphData;
use crate::parse::compute_sentiment;
use crate::util::{hex_color_or, relative_day_label};

use super::{ComposerState, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

enum ComposerAction {
    TogglePinned(String),
    AddPerson(String),
    Submit,
    Clear,
}

impl ViewModel {
    pub(in crate::app) fn new(snapshot: Snapshot, iterations: usize) -> Self {
        Self {
            snapshot,
            iterations,
            search: String::new(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            base_graph: GraphData::default(),
            display_graph: GraphData::default(),
            graph_dirty: true,
            unsaved_changes: false,
            last_error: None,
            composer: ComposerState::default(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        let mut save_requested = false;
        let mut clear_error = false;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("socialq");
                    ui.separator();
                    ui.label(format!("data: {}", data_path.display()));
                    ui.label(format!("people: {}", self.snapshot.people.len()));
                    ui.label(format!("interactions: {}", self.snapshot.interactions.len()));

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Save").clicked() {
                        save_requested = true;
                    }
                    if self.unsaved_changes {
                        ui.label(RichText::new("unsaved changes").color(Color32::from_rgb(255, 215, 64)));
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(error) = &self.last_error
                            && ui
                                .link(RichText::new(error.as_str()).color(Color32::from_rgb(255, 82, 82)))
                                .clicked()
                        {
                            clear_error = true;
                        }
                    });
                });
            });

        if save_requested {
            match save_snapshot(data_path, &self.snapshot) {
                Ok(()) => {
                    self.unsaved_changes = false;
                    self.last_error = None;
                }
                Err(error) => {
                    log::error!("saving snapshot failed: {error:#}");
                    self.last_error = Some(error.to_string());
                }
            }
        }
        if clear_error {
            self.last_error = None;
        }

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading relationship data...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn filtered_people(&self) -> Vec<&Person> {
        let query = self.search.trim();
        if query.is_empty() {
            return self.snapshot.people.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .snapshot
            .people
            .iter()
            .filter_map(|person| {
                let target = match &person.nickname {
                    Some(nickname) => format!("{} {nickname}", person.name),
                    None => person.name.clone(),
                };
                fuzzy_match_score(&matcher, &target, query).map(|score| (score, person))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, person)| person).collect()
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("People");
        ui.add(TextEdit::singleline(&mut self.search).hint_text("Search people"));
        ui.add_space(4.0);

        let mut next_selection: Option<Option<String>> = None;
        {
            let selected = self.selected.clone();
            let people = self.filtered_people();
            egui::ScrollArea::vertical()
                .id_salt("people_list")
                .max_height(240.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    if people.is_empty() {
                        ui.label(RichText::new("No people yet. Log an interaction below.").weak());
                    }
                    for person in people {
                        let is_selected = selected.as_deref() == Some(person.id.as_str());
                        let label = format!(
                            "{}  |  {}",
                            person.display_name(),
                            closeness_label(person.closeness_level)
                        );
                        if ui.selectable_label(is_selected, label).clicked() {
                            next_selection =
                                Some(if is_selected { None } else { Some(person.id.clone()) });
                        }
                    }
                });
        }
        if let Some(next) = next_selection {
            self.set_selected(next);
        }

        ui.separator();
        ui.heading("Log an interaction");
        ui.add(
            TextEdit::multiline(&mut self.composer.text)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Had coffee with Sarah yesterday at Blue Bottle"),
        );
        self.ensure_composer_parsed();

        let mut actions: Vec<ComposerAction> = Vec::new();

        if let Some(parsed) = &self.composer.parsed
            && !parsed.notes.is_empty()
        {
            ui.add_space(4.0);
            egui::Grid::new("parse_preview")
                .num_columns(2)
                .spacing([10.0, 2.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("title").weak());
                    ui.label(parsed.title.as_str());
                    ui.end_row();

                    ui.label(RichText::new("when").weak());
                    let when = parsed.occurred_at.format("%Y-%m-%d %H:%M").to_string();
                    match &parsed.date_source {
                        Some(source) => ui.label(format!("{when}  (from \"{source}\")")),
                        None => ui.label(format!("{when}  (now)")),
                    };
                    ui.end_row();

                    ui.label(RichText::new("type").weak());
                    ui.label(
                        parsed
                            .inferred_type
                            .map(|kind| kind.label())
                            .unwrap_or("unknown"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("where").weak());
                    ui.label(parsed.location.as_deref().unwrap_or("unknown"));
                    ui.end_row();

                    ui.label(RichText::new("feels").weak());
                    let sentiment = compute_sentiment(&parsed.notes);
                    ui.label(
                        RichText::new(sentiment_label(sentiment))
                            .color(hex_color_or(sentiment_color(sentiment), Color32::GRAY)),
                    );
                    ui.end_row();

                    ui.label(RichText::new("people").weak());
                    let names = parsed
                        .matched_people
                        .iter()
                        .map(Person::display_name)
                        .collect::<Vec<_>>()
                        .join(", ");
                    ui.label(if names.is_empty() {
                        "none matched".to_owned()
                    } else {
                        names
                    });
                    ui.end_row();
                });

            for ambiguous in &parsed.ambiguous_matches {
                ui.add_space(2.0);
                ui.label(format!("Multiple contacts named {}:", ambiguous.name));
                ui.horizontal_wrapped(|ui| {
                    for candidate in &ambiguous.candidates {
                        let pinned = self.composer.pinned_people.contains(&candidate.id);
                        if ui
                            .selectable_label(pinned, candidate.name.as_str())
                            .clicked()
                        {
                            actions.push(ComposerAction::TogglePinned(candidate.id.clone()));
                        }
                    }
                });
            }

            if !parsed.unmatched_names.is_empty() {
                ui.add_space(2.0);
                ui.horizontal_wrapped(|ui| {
                    ui.label("New people:");
                    for name in &parsed.unmatched_names {
                        if ui.button(format!("+ {name}")).clicked() {
                            actions.push(ComposerAction::AddPerson(name.clone()));
                        }
                    }
                });
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Add interaction").clicked() {
                    actions.push(ComposerAction::Submit);
                }
                if ui.button("Clear").clicked() {
                    actions.push(ComposerAction::Clear);
                }
            });
        }

        for action in actions {
            match action {
                ComposerAction::TogglePinned(person_id) => self.toggle_pinned_person(person_id),
                ComposerAction::AddPerson(name) => self.add_person_named(&name),
                ComposerAction::Submit => self.submit_composer(),
                ComposerAction::Clear => self.composer = ComposerState::default(),
            }
        }
    }

    fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(4.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a person in the graph or the list to see their relationship history.");
            return;
        };
        let Some(person) = self.snapshot.person(&selected_id).cloned() else {
            // Selection can go stale across a reload.
            self.set_selected(None);
            return;
        };

        ui.label(RichText::new(person.display_name()).strong().size(18.0));
        if person.nickname.is_some() {
            ui.label(RichText::new(person.name.as_str()).weak());
        }
        ui.horizontal(|ui| {
            let color = hex_color_or(person.relationship_type.color(), Color32::GRAY);
            ui.label(RichText::new(person.relationship_type.label()).color(color));
            ui.label("|");
            ui.label(closeness_label(person.closeness_level));
        });
        if let Some(last) = person.last_interaction_at {
            ui.label(format!(
                "last interaction {}",
                relative_day_label(last, Utc::now())
            ));
        }
        if let Some(notes) = &person.notes {
            ui.add_space(4.0);
            ui.label(RichText::new(notes.as_str()).italics());
        }
        ui.add_space(4.0);
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
            return;
        }

        ui.separator();
        ui.label(RichText::new("Interactions").strong());

        let mut history = self
            .snapshot
            .interactions
            .iter()
            .filter(|interaction| {
                interaction
                    .people
                    .iter()
                    .any(|participant| participant.id == person.id)
            })
            .collect::<Vec<_>>();
        history.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        if history.is_empty() {
            ui.label(RichText::new("Nothing logged yet.").weak());
            return;
        }

        egui::ScrollArea::vertical().id_salt("history").show(ui, |ui| {
            for interaction in history {
                ui.add_space(4.0);
                ui.label(RichText::new(interaction.title.as_str()).strong());
                ui.horizontal(|ui| {
                    ui.label(interaction.kind.label());
                    ui.label("|");
                    let color = hex_color_or(sentiment_color(interaction.sentiment), Color32::GRAY);
                    ui.label(RichText::new(sentiment_label(interaction.sentiment)).color(color));
                    ui.label("|");
                    ui.label(relative_day_label(interaction.occurred_at, Utc::now()));
                });
                if let Some(location) = &interaction.location {
                    ui.label(RichText::new(format!("at {location}")).weak());
                }
            }
        });
    }
}
