use page_router::{active_page, PageContext, PageInfo, Router, RouterOptions};

struct Note {
    id: u32,
    title: &'static str,
    body: &'static str,
}

pub struct Notes {
    notes: Vec<Note>,
}

impl Default for Notes {
    fn default() -> Self {
        Self {
            notes: vec![
                Note {
                    id: 1,
                    title: "Groceries",
                    body: "Milk, eggs, flour.",
                },
                Note {
                    id: 2,
                    title: "Ideas",
                    body: "A router that remembers where you were.",
                },
                Note {
                    id: 3,
                    title: "Reading",
                    body: "Chapter 4 onwards.",
                },
            ],
        }
    }
}

pub struct DemoApp {
    router: Router<Notes>,
    notes: Notes,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let mut router = Router::new(
            cc.egui_ctx.clone(),
            RouterOptions::default(),
            render_page,
        )?;
        router.set_title_formatter(|title| format!("{title} - Page Router"));
        router.set_transition(fade);
        router.set_on_location_change(|location| {
            log::debug!("Location changed to {location}");
        });

        Ok(Self {
            router,
            notes: Notes::default(),
        })
    }

    fn draw_toolbar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let session = self.router.session();
            let can_go_back = session.history().can_go_back();
            let can_go_forward = session.history().can_go_forward();
            drop(session);

            if ui.add_enabled(can_go_back, egui::Button::new("⏴")).clicked() {
                self.router.back();
            }
            if ui
                .add_enabled(can_go_forward, egui::Button::new("⏵"))
                .clicked()
            {
                self.router.forward();
            }
            if let Some(page) = active_page(ui.ctx(), self.router.id()) {
                ui.monospace(page.to);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(if page_router::IS_WEB { "web" } else { "native" });
            });
        });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.draw_toolbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.router.ui(&mut self.notes, ui));
    }
}

fn fade(ui: &mut egui::Ui, page: &PageInfo, render: &mut dyn FnMut(&mut egui::Ui)) {
    let opacity = ui.ctx().animate_bool_with_time(
        ui.id().with("fade"),
        page.state.is_active(),
        0.2,
    );
    if opacity > 0.0 {
        ui.scope(|ui| {
            ui.set_opacity(opacity);
            render(ui);
        });
    }
}

fn render_page(notes: &mut Notes, ui: &mut egui::Ui, ctx: &PageContext<'_>) {
    ui.horizontal(|ui| {
        ctx.link(ui, "Home", "/");
        ctx.link(ui, "Notes", "/notes");
        ctx.link(ui, "Notes (newest first)", "/notes?sort=desc");
    });
    ui.separator();

    match ctx.page.path_segments.as_slice() {
        [] => {
            ctx.set_title(ui, "Home");
            ui.heading("Home");
            ui.label("Pick a note to read.");
        }
        [notes_segment] if notes_segment == "notes" => {
            ctx.set_title(ui, "Notes");
            ui.heading("Notes");
            let mut ordered = notes.notes.iter().collect::<Vec<_>>();
            if ctx.page.param("sort") == Some("desc") {
                ordered.reverse();
            }
            for note in ordered {
                ctx.link(ui, note.title, &format!("/notes/{}", note.id));
            }
        }
        [notes_segment, id] if notes_segment == "notes" => {
            let note = id
                .parse::<u32>()
                .ok()
                .and_then(|id| notes.notes.iter().find(|note| note.id == id));
            match note {
                Some(note) => {
                    ctx.set_title(ui, note.title);
                    ui.heading(note.title);
                    ui.label(note.body);
                    if ui.button("Back").clicked() {
                        ctx.back();
                    }
                }
                None => not_found(ui, ctx),
            }
        }
        _ => not_found(ui, ctx),
    }
}

fn not_found(ui: &mut egui::Ui, ctx: &PageContext<'_>) {
    ctx.set_title(ui, "Not Found");
    ui.vertical_centered_justified(|ui| {
        ui.heading("Not Found");
        ui.label("The requested page was not found.");
        ui.label("Please check the URL and try again.");
    });
}
