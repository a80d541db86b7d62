use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::effect::Effect;
use pokedex::logger;
use pokedex::reducer::reducer;
use pokedex::state::AppState;
use pokedex::ui;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the first 151 Pokemon from PokeAPI")]
struct Args {
    /// Catalog endpoint; `?limit=151` is appended
    #[arg(long, default_value = api::CATALOG_BASE_URL)]
    catalog_url: String,

    /// Where to write diagnostics (level via POKEDEX_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    Grid,
    Search,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    Grid,
    Search,
    Overlay,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else if self.selection.is_open() {
            Some(DexComponentId::Overlay)
        } else {
            Some(DexComponentId::Grid)
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else if self.selection.is_open() {
            Some(DexComponentId::Overlay)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::Grid => DexContext::Grid,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Overlay => DexContext::Overlay,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::Grid
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        catalog_url,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let log_path = log_file.unwrap_or_else(logger::default_log_file);
    let _log_guard = logger::init_logger_or_report(&log_path);
    tracing::info!(%catalog_url, "starting pokedex");

    let debug = DebugSession::new(debug_args);
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(catalog_url))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex exited");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct DexUi {
    columns: usize,
}

impl DexUi {
    fn new() -> Self {
        Self { columns: 1 }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let areas = ui::render_app(frame, area, state);
        self.columns = areas.columns;
        event_ctx.set_component_area(DexComponentId::Grid, areas.grid);
        event_ctx.set_component_area(DexComponentId::Search, areas.search);
        match areas.overlay {
            Some(overlay) => event_ctx.set_component_area(DexComponentId::Overlay, overlay),
            None => {
                event_ctx
                    .component_areas
                    .remove(&DexComponentId::Overlay);
            }
        }
    }

    fn handle_grid_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        handler_response(ui::handle_grid_event(event, state, self.columns))
    }

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handler_response(ui::handle_overlay_event(event, state, self.columns))
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handler_response(ui::handle_search_event(event, state))
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(DexComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(DexComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') if !state.search.active => {
                HandlerResponse::action(Action::Quit)
            }
            crossterm::event::KeyCode::Char('/') if !state.search.active => {
                HandlerResponse::action(Action::SearchStart)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let key = TaskKey::new(effect.task_key());
    match effect {
        Effect::LoadCatalog { url } => {
            ctx.tasks().spawn(key, async move {
                match api::fetch_catalog(&url).await {
                    Ok(entries) => {
                        tracing::info!(count = entries.len(), "catalog loaded");
                        Action::CatalogDidLoad(entries)
                    }
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "catalog fetch failed");
                        Action::CatalogDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadCardDetail {
            name,
            url,
            generation,
        } => {
            ctx.tasks().spawn(key, async move {
                match api::fetch_detail(&url).await {
                    Ok(detail) => Action::CardDetailDidLoad {
                        name,
                        generation,
                        detail,
                    },
                    Err(err) => {
                        tracing::warn!(%name, %url, error = %err, "card detail fetch failed");
                        Action::CardDetailDidError {
                            name,
                            generation,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadOverlayDetail { url, generation } => {
            ctx.tasks().spawn(key, async move {
                match api::fetch_detail(&url).await {
                    Ok(detail) => Action::OverlayDetailDidLoad { generation, detail },
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "overlay detail fetch failed");
                        Action::OverlayDetailDidError {
                            generation,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::CancelCardDetail { .. } | Effect::CancelOverlayDetail => {
            ctx.tasks().cancel(&key);
        }
    }
}
