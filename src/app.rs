use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db;
use crate::estimate::{price_label, EstimateError, HttpEstimator, PriceEstimator, PLACEHOLDER_PRICE};
use crate::form::{FieldKind, FormField, FormState};
use crate::picker::{FieldCatalog, Picker};

pub const SUBMIT_LABEL: &str = "Get Price";
pub const LOADING_LABEL: &str = "Estimating…";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Field(FormField),
    Submit,
}

impl Focus {
    pub fn position(&self) -> usize {
        match self {
            Focus::Field(field) => FormField::ALL
                .iter()
                .position(|f| f == field)
                .unwrap_or_default(),
            Focus::Submit => FormField::ALL.len(),
        }
    }

    fn from_position(idx: usize) -> Self {
        FormField::ALL
            .get(idx)
            .map(|f| Focus::Field(*f))
            .unwrap_or(Focus::Submit)
    }

    fn next(&self) -> Self {
        Self::from_position((self.position() + 1) % (FormField::ALL.len() + 1))
    }

    fn prev(&self) -> Self {
        let idx = self.position();
        if idx == 0 {
            Focus::Submit
        } else {
            Self::from_position(idx - 1)
        }
    }
}

type EstimateReply = Result<f64, EstimateError>;

pub struct App {
    pub should_quit: bool,
    pub form: FormState,
    pub picker: Picker,
    pub catalog: FieldCatalog,
    pub focus: Focus,

    /// Text of the price panel once a request has finished.
    pub price: Option<String>,

    estimator: Arc<dyn PriceEstimator>,
    pending: Option<Receiver<EstimateReply>>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let conn = db::open(&config.db_path())?;
        if let Some(seed) = &config.catalog_seed {
            db::seed_catalog(&conn, seed)?;
        }
        let catalog = db::load_catalog(&conn)?;
        let estimator = HttpEstimator::new(config.price_url.clone())?;
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        info!(
            endpoint = %config.price_url,
            brands = catalog.len("brand"),
            models = catalog.len("model"),
            towns = catalog.len("town"),
            "price form ready"
        );

        Ok(Self::with_parts(catalog, Arc::new(estimator), &today))
    }

    pub fn with_parts(catalog: FieldCatalog, estimator: Arc<dyn PriceEstimator>, today: &str) -> Self {
        Self {
            should_quit: false,
            form: FormState::new(today),
            picker: Picker::Closed,
            catalog,
            focus: Focus::Field(FormField::ALL[0]),
            price: None,
            estimator,
            pending: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            LOADING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') if !self.picker.is_open() => self.submit(),
                _ => {}
            }
            return;
        }

        // An open picker owns every key, so nothing reaches the form beneath it.
        if self.picker.is_open() {
            self.handle_picker(key.code);
        } else {
            self.handle_form(key.code);
        }
    }

    fn handle_picker(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.picker.close(),
            KeyCode::Up => self.picker.move_up(),
            KeyCode::Down => self.picker.move_down(),
            KeyCode::Enter => self.picker.select_highlighted(&mut self.form),
            KeyCode::Backspace => self.picker.pop_search(),
            KeyCode::Char(c) => self.picker.push_search(c),
            _ => {}
        }
    }

    fn handle_form(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            _ => {}
        }

        let field = match self.focus {
            Focus::Submit => {
                if key == KeyCode::Enter {
                    self.submit();
                }
                return;
            }
            Focus::Field(field) => field,
        };

        match field.kind() {
            FieldKind::Picker { catalog_key, title } => match key {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.picker.open(field, catalog_key, title, &self.catalog)
                }
                KeyCode::Backspace | KeyCode::Delete => self.form.set_text(field, ""),
                _ => {}
            },
            FieldKind::Number | FieldKind::Date => match key {
                KeyCode::Char(c) => self.form.push_char(field, c),
                KeyCode::Backspace => self.form.pop_char(field),
                KeyCode::Enter => self.focus = self.focus.next(),
                _ => {}
            },
            FieldKind::Choice(_) => match key {
                KeyCode::Right | KeyCode::Char(' ') => self.form.cycle_choice(field, true),
                KeyCode::Left => self.form.cycle_choice(field, false),
                KeyCode::Enter => self.focus = self.focus.next(),
                _ => {}
            },
            FieldKind::Checkbox => {
                if matches!(key, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.form.toggle(field);
                }
            }
        }
    }

    /// Snapshots the form and hands it to a worker thread. The submit
    /// button stays disabled until `poll_estimate` sees the reply.
    pub fn submit(&mut self) {
        if self.is_submitting() {
            debug!("submit ignored, request already in flight");
            return;
        }

        let snapshot = self.form.snapshot();
        debug!(params = ?snapshot.query_pairs(), "submitting price form");

        let estimator = Arc::clone(&self.estimator);
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("price-estimate".into())
            .spawn(move || {
                let _ = tx.send(estimator.estimate(&snapshot));
            });

        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                warn!(error = %e, "could not start price worker");
                self.finish_estimate(Err(EstimateError::Worker));
            }
        }
    }

    pub fn poll_estimate(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let reply = match rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(EstimateError::Worker),
        };
        self.finish_estimate(reply);
    }

    fn finish_estimate(&mut self, reply: EstimateReply) {
        self.pending = None;
        let text = match reply {
            Ok(price) => price_label(price),
            Err(e) => {
                error!(error = %e, "price estimate failed");
                PLACEHOLDER_PRICE.to_string()
            }
        };
        self.price = Some(text);
    }
}
