use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::seq::SliceRandom;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use std::time::Duration;

use crate::cli::signed_in_context;
use crate::error::{Result, YaquedoError};
use crate::export::{export_xlsx, ExportOptions};
use crate::filters::{
    apply_filters, compute_stats, toggle_preset, DatePreset, FilterState, ReceiptStats,
};
use crate::fmt;
use crate::models::{BankAccount, Comprobante, UserProfile};
use crate::repository::Repository;
use crate::settings;
use crate::tour::{poll_until, step_content, Effect, Route, TourEngine, TourStep, Trigger};
use crate::tui::{
    money_span, wrap_text, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE, TOUR_STYLE,
};
use crate::usage::{fetch_usage, UsageReport};

const GREETINGS: &[&str] = &[
    "Tus pagos, al día.",
    "Veamos qué llegó hoy.",
    "Los comprobantes no se validan solos. Bueno, en realidad sí.",
    "¿Cobraste? Aquí te decimos si ya quedó.",
    "Otro día, otra transferencia.",
    "Todo en orden. Casi siempre.",
];

/// How long a tour step waits for its target pane before giving up.
const TOUR_TARGET_TIMEOUT: Duration = Duration::from_secs(5);
const TOUR_POLL_INTERVAL: Duration = Duration::from_millis(100);

enum InputMode {
    Normal,
    Search,
    ConfirmDelete,
    AccountForm,
}

const FORM_LABELS: &[&str] = &["Nombre:", "Número:", "Titular:"];

#[derive(Default)]
struct AccountForm {
    values: [String; 3],
    active: usize,
}

struct Dashboard<'a> {
    repo: Repository<'a>,
    profile: UserProfile,
    greeting: String,
    receipts: Vec<Comprobante>,
    filtered: Vec<Comprobante>,
    stats: ReceiptStats,
    filters: FilterState,
    usage: UsageReport,
    accounts: Vec<BankAccount>,
    route: Route,
    selected: usize,
    mode: InputMode,
    form: AccountForm,
    status_message: Option<String>,
    tour: Option<TourEngine>,
    quit: bool,
}

/// Bridge the async gateway calls into the synchronous event loop. The UI
/// blocks for the duration of each call, which is the loading state.
fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
}

impl<'a> Dashboard<'a> {
    fn new(
        repo: Repository<'a>,
        profile: UserProfile,
        receipts: Vec<Comprobante>,
        usage: UsageReport,
        accounts: Vec<BankAccount>,
        email: &str,
        start_tour: bool,
    ) -> Self {
        let mut rng = rand::thread_rng();
        let random_greeting = GREETINGS.choose(&mut rng).unwrap_or(&"Hola.").to_string();
        let first_name = profile
            .nombre_completo
            .split_whitespace()
            .next()
            .unwrap_or(email);
        let greeting = format!("Hola, {first_name}. {random_greeting}");
        let filtered = receipts.clone();
        let stats = compute_stats(&filtered);
        Self {
            repo,
            profile,
            greeting,
            receipts,
            filtered,
            stats,
            filters: FilterState::default(),
            usage,
            accounts,
            route: Route::Dashboard,
            selected: 0,
            mode: InputMode::Normal,
            form: AccountForm::default(),
            status_message: None,
            tour: if start_tour { Some(TourEngine::new()) } else { None },
            quit: false,
        }
    }

    /// Synchronous recomputation from (full list, filters); runs on every
    /// input change.
    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.receipts, &self.filters);
        self.stats = compute_stats(&self.filtered);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    fn refresh(&mut self) {
        match block_on(self.repo.fetch_receipts()) {
            Ok(rows) => {
                self.receipts = rows;
                self.recompute();
            }
            Err(e) => self.status_message = Some(format!("No se pudo actualizar: {e}")),
        }
    }

    // -- tour ---------------------------------------------------------------

    fn tour_active(&self) -> bool {
        matches!(&self.tour, Some(t) if !t.is_finished())
    }

    fn start_tour(&mut self) {
        match &mut self.tour {
            Some(t) => t.restart(),
            None => self.tour = Some(TourEngine::new()),
        }
        self.route = Route::Dashboard;
    }

    fn target_ready(&self, target: &str) -> bool {
        match target {
            "stats-panel" | "receipts-table" | "profile-link" => self.route == Route::Dashboard,
            "account-form" => self.route == Route::Profile,
            _ => false,
        }
    }

    fn trigger_tour(&mut self, trigger: Trigger) {
        let Some(tour) = &mut self.tour else { return };
        let effects = tour.handle(trigger);
        for effect in effects {
            match effect {
                Effect::Navigate(route) => self.route = route,
                Effect::AwaitTarget(target) => {
                    let ready = poll_until(
                        || self.target_ready(target),
                        TOUR_TARGET_TIMEOUT,
                        TOUR_POLL_INTERVAL,
                    );
                    if !ready {
                        self.status_message =
                            Some("No se encontró el siguiente paso del recorrido.".to_string());
                    }
                }
                Effect::PersistCompletion => self.persist_tour_completion(),
            }
        }
    }

    /// The local flip happens regardless; a persistence failure is only
    /// reported, never blocks ending the tour.
    fn persist_tour_completion(&mut self) {
        self.profile.onboarding_completed = true;
        if let Err(e) = block_on(self.repo.complete_onboarding()) {
            log::warn!("persisting onboarding_completed failed: {e}");
            self.status_message =
                Some("El recorrido terminó, pero no se pudo guardar el progreso.".to_string());
        } else {
            self.status_message = Some("¡Recorrido completado!".to_string());
        }
    }

    // -- input --------------------------------------------------------------

    fn handle_key(&mut self, code: KeyCode) {
        self.status_message = None;
        match self.mode {
            InputMode::Search => self.handle_search_key(code),
            InputMode::ConfirmDelete => self.handle_confirm_key(code),
            InputMode::AccountForm => self.handle_form_key(code),
            InputMode::Normal => {
                if self.tour_active() {
                    self.handle_tour_key(code);
                } else {
                    self.handle_normal_key(code);
                }
            }
        }
    }

    fn handle_tour_key(&mut self, code: KeyCode) {
        let step = self.tour.as_ref().map(|t| t.step());
        match code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                self.trigger_tour(Trigger::Advance);
            }
            KeyCode::Esc => self.trigger_tour(Trigger::Skip),
            // The bank-account step needs the real form, not a keypress.
            KeyCode::Char('a') if step == Some(TourStep::AddBankAccount) => {
                self.form = AccountForm::default();
                self.mode = InputMode::AccountForm;
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match self.route {
            Route::Dashboard => self.handle_dashboard_key(code),
            Route::Profile => self.handle_profile_key(code),
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) {
        let today = chrono::Local::now().date_naive();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Char('s') => {
                self.filters.status = self.filters.status.next();
                self.recompute();
            }
            KeyCode::Char('1') => self.apply_preset(DatePreset::Today, today),
            KeyCode::Char('2') => self.apply_preset(DatePreset::ThisWeek, today),
            KeyCode::Char('3') => self.apply_preset(DatePreset::ThisMonth, today),
            KeyCode::Char('4') => self.apply_preset(DatePreset::LastMonth, today),
            KeyCode::Char('c') => {
                self.filters = FilterState::default();
                self.recompute();
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.filtered.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('d') => {
                if !self.filtered.is_empty() {
                    self.mode = InputMode::ConfirmDelete;
                }
            }
            KeyCode::Char('e') => self.export_filtered(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('p') => self.route = Route::Profile,
            KeyCode::Char('t') => self.start_tour(),
            _ => {}
        }
    }

    fn handle_profile_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.route = Route::Dashboard,
            KeyCode::Char('a') => {
                self.form = AccountForm::default();
                self.mode = InputMode::AccountForm;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Char(c) => {
                self.filters.search.push(c);
                self.recompute();
            }
            KeyCode::Backspace => {
                self.filters.search.pop();
                self.recompute();
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('s') => {
                self.mode = InputMode::Normal;
                if let Some(receipt) = self.filtered.get(self.selected) {
                    let id = receipt.id;
                    match block_on(self.repo.delete_receipt(id)) {
                        Ok(rows) => {
                            self.receipts = rows;
                            self.recompute();
                            self.status_message = Some("Comprobante eliminado.".to_string());
                        }
                        Err(e) => {
                            self.status_message = Some(format!("No se pudo eliminar: {e}"))
                        }
                    }
                }
            }
            _ => self.mode = InputMode::Normal,
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Char(c) => self.form.values[self.form.active].push(c),
            KeyCode::Backspace => {
                self.form.values[self.form.active].pop();
            }
            KeyCode::Up => self.form.active = self.form.active.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                self.form.active = (self.form.active + 1).min(FORM_LABELS.len() - 1);
            }
            KeyCode::Enter => {
                if self.form.active + 1 < FORM_LABELS.len() {
                    self.form.active += 1;
                } else {
                    self.submit_account_form();
                }
            }
            _ => {}
        }
    }

    fn submit_account_form(&mut self) {
        let [nombre, numero, titular] = &self.form.values;
        if nombre.trim().is_empty() || numero.trim().is_empty() || titular.trim().is_empty() {
            self.status_message = Some("Completa los tres campos.".to_string());
            return;
        }
        match block_on(self.repo.add_account(nombre.trim(), numero.trim(), titular.trim())) {
            Ok(account) => {
                self.accounts.push(account);
                self.mode = InputMode::Normal;
                self.status_message = Some("Cuenta agregada.".to_string());
                // A submitted form is the real action the tour step waits for.
                if self.tour_active() {
                    self.trigger_tour(Trigger::ActionDone);
                }
            }
            Err(e) => self.status_message = Some(format!("No se pudo agregar: {e}")),
        }
    }

    fn apply_preset(&mut self, preset: DatePreset, today: chrono::NaiveDate) {
        self.filters.date_range = toggle_preset(self.filters.date_range, preset, today);
        self.recompute();
    }

    fn export_filtered(&mut self) {
        match export_xlsx(&self.filtered, &ExportOptions { range: None, output: None }) {
            Ok(summary) => {
                self.status_message = Some(format!(
                    "Exportados {} comprobantes a {}",
                    summary.records,
                    summary.path.display()
                ));
            }
            Err(e) => self.status_message = Some(format!("No se pudo exportar: {e}")),
        }
    }

    // -- drawing ------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let tour_height = if self.tour_active() { 6 } else { 0 };
        let [header_area, stats_area, filter_area, table_area, status_area, tour_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(tour_height),
                Constraint::Length(1),
            ])
            .areas(area);

        self.draw_header(frame, header_area);
        match self.route {
            Route::Dashboard => {
                self.draw_stats(frame, stats_area);
                self.draw_filter_bar(frame, filter_area);
                self.draw_table(frame, table_area);
            }
            Route::Profile => self.draw_profile(frame, stats_area, table_area),
        }
        if let InputMode::AccountForm = self.mode {
            self.draw_account_form(frame, table_area);
        }
        self.draw_status(frame, status_area);
        if self.tour_active() {
            self.draw_tour_overlay(frame, tour_area);
        }
        self.draw_footer(frame, footer_area);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let usage = match self.usage.quota {
            Some(quota) => format!(
                "{} · {} / {} este mes ({:.0} %)",
                self.usage.plan.display_name(),
                self.usage.total,
                quota,
                self.usage.pct
            ),
            None => format!(
                "{} · {} este mes",
                self.usage.plan.display_name(),
                self.usage.total
            ),
        };
        let line = Line::from(vec![
            Span::styled(self.greeting.clone(), HEADER_STYLE),
            Span::raw("  "),
            Span::styled(usage, FOOTER_STYLE),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Whether the current tour step points at the named pane.
    fn highlighted(&self, target: &str) -> bool {
        matches!(
            &self.tour,
            Some(t) if step_content(t.step()).and_then(|c| c.target) == Some(target)
        )
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.highlighted("stats-panel") {
            TOUR_STYLE
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cards = [
            ("Comprobantes", self.stats.total.to_string()),
            ("Válidos", self.stats.validos.to_string()),
            ("Inválidos", self.stats.invalidos.to_string()),
            ("Valor validado", fmt::money(self.stats.valor_total)),
            ("Banco más usado", self.stats.banco_mas_usado.clone()),
        ];
        let constraints: Vec<Constraint> =
            cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32)).collect();
        let slots = Layout::horizontal(constraints).split(area);
        for ((label, value), slot) in cards.iter().zip(slots.iter()) {
            let block = Block::default().borders(Borders::ALL).border_style(border_style);
            let text = vec![
                Line::from(Span::styled(*label, FOOTER_STYLE)),
                Line::from(Span::styled(
                    value.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ];
            frame.render_widget(Paragraph::new(text).block(block), *slot);
        }
    }

    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let range = match &self.filters.date_range {
            Some(r) => format!(
                "{} - {}",
                r.from.format("%d/%m/%Y"),
                r.effective_to().format("%d/%m/%Y")
            ),
            None => "todas las fechas".to_string(),
        };
        let search_style = if matches!(self.mode, InputMode::Search) {
            SELECTED_STYLE
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::raw(" Buscar: "),
            Span::styled(
                if self.filters.search.is_empty() && !matches!(self.mode, InputMode::Search) {
                    "—".to_string()
                } else {
                    self.filters.search.clone()
                },
                search_style,
            ),
            Span::raw("  Estado: "),
            Span::styled(self.filters.status.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  Rango: {range}  ")),
            Span::styled(
                format!(
                    "[1]{} [2]{} [3]{} [4]{}",
                    DatePreset::Today.label(),
                    DatePreset::ThisWeek.label(),
                    DatePreset::ThisMonth.label(),
                    DatePreset::LastMonth.label()
                ),
                FOOTER_STYLE,
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.highlighted("receipts-table") {
            TOUR_STYLE
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Comprobantes");

        if self.filtered.is_empty() {
            frame.render_widget(
                Paragraph::new("Sin comprobantes para los filtros actuales.").block(block),
                area,
            );
            return;
        }

        let header = Row::new(vec!["Fecha", "Beneficiario", "Banco", "Valor", "Estado"])
            .style(HEADER_STYLE);
        let rows: Vec<Row> = self
            .filtered
            .iter()
            .map(|r| {
                let estado = if r.es_valido { "Válido" } else { "Inválido" };
                Row::new(vec![
                    Cell::from(fmt::fecha_display(&r.fecha)),
                    Cell::from(r.nombre_beneficiario.as_deref().unwrap_or("N/A").to_string()),
                    Cell::from(r.banco_emisor.clone()),
                    Cell::from(money_span(r.valor_transferencia, r.es_valido)),
                    Cell::from(estado),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(18),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .row_highlight_style(SELECTED_STYLE)
        .block(block);
        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_profile(&self, frame: &mut Frame, info_area: Rect, list_area: Rect) {
        let info = vec![
            Line::from(Span::styled("Perfil", HEADER_STYLE)),
            Line::from(format!(
                "{} · {} · plan {}",
                self.profile.nombre_completo,
                self.profile.nombre_negocio,
                self.profile.plan.display_name()
            )),
            Line::from(Span::styled(
                format!("Cédula {}", self.profile.cedula),
                FOOTER_STYLE,
            )),
        ];
        frame.render_widget(Paragraph::new(info), info_area);

        let border_style = if self.highlighted("account-form") {
            TOUR_STYLE
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Cuentas de recaudo");
        let lines: Vec<Line> = if self.accounts.is_empty() {
            vec![Line::from("Aún no tienes cuentas de recaudo. Pulsa 'a' para agregar una.")]
        } else {
            self.accounts
                .iter()
                .map(|a| {
                    Line::from(format!(
                        " {} · {} · {}",
                        a.nombre, a.numero_cuenta, a.titular
                    ))
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), list_area);
    }

    fn draw_account_form(&self, frame: &mut Frame, area: Rect) {
        let form_width = 50u16.min(area.width.saturating_sub(4));
        let form_height = (FORM_LABELS.len() as u16) + 4;
        let x = area.x + (area.width.saturating_sub(form_width)) / 2;
        let y = area.y + (area.height.saturating_sub(form_height)) / 2;
        let popup = Rect::new(x, y, form_width, form_height.min(area.height));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TOUR_STYLE)
            .title("Nueva cuenta de recaudo");
        let mut lines = Vec::new();
        for (i, label) in FORM_LABELS.iter().enumerate() {
            let style = if i == self.form.active {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(format!(" {label:<9}")),
                Span::styled(self.form.values[i].clone(), style),
            ]));
        }
        lines.push(Line::from(Span::styled(
            " Enter=siguiente/guardar  Esc=cancelar",
            FOOTER_STYLE,
        )));
        frame.render_widget(ratatui::widgets::Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {msg}"), HEADER_STYLE)),
                area,
            );
        }
    }

    fn draw_tour_overlay(&self, frame: &mut Frame, area: Rect) {
        let Some(tour) = &self.tour else { return };
        let Some(content) = step_content(tour.step()) else { return };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TOUR_STYLE)
            .title(content.title);
        let width = area.width.saturating_sub(4) as usize;
        let (body, _) = wrap_text(content.body, width.max(10));
        let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
        let hint = if tour.step() == TourStep::AddBankAccount {
            " a=abrir formulario  Esc=saltar recorrido"
        } else {
            " Enter=continuar  Esc=saltar recorrido"
        };
        lines.push(Line::from(Span::styled(hint, FOOTER_STYLE)));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match (&self.mode, self.route) {
            (InputMode::Search, _) => " escribe para buscar  Enter/Esc=listo".to_string(),
            (InputMode::ConfirmDelete, _) => {
                " ¿Eliminar el comprobante seleccionado? y=sí  n=no".to_string()
            }
            (InputMode::AccountForm, _) => String::new(),
            (_, Route::Profile) => " a=agregar cuenta  b/Esc=volver  q=salir".to_string(),
            (_, Route::Dashboard) => {
                let profile_hint = if self.highlighted("profile-link") {
                    Span::styled(" p=perfil ", TOUR_STYLE)
                } else {
                    Span::raw(" p=perfil ")
                };
                let line = Line::from(vec![
                    Span::styled(
                        " /=buscar s=estado 1-4=rango c=limpiar e=exportar d=eliminar r=actualizar t=tutorial",
                        FOOTER_STYLE,
                    ),
                    profile_hint,
                    Span::styled("q=salir", FOOTER_STYLE),
                ]);
                frame.render_widget(Paragraph::new(line), area);
                return;
            }
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hints, FOOTER_STYLE)),
            area,
        );
    }
}

/// Run the interactive dashboard. `force_tour` re-enters the tour even for
/// users who already completed it.
pub async fn run(force_tour: bool) -> Result<()> {
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);

    let profile = repo.fetch_profile().await?;
    if !profile.is_active {
        // The activation gate applies to cached sessions too.
        settings::store_session(None)?;
        return Err(YaquedoError::AccessDenied);
    }

    let receipts = repo.fetch_receipts().await?;
    let accounts = repo.fetch_accounts().await?;
    let today = chrono::Local::now().date_naive();
    let usage = fetch_usage(&ctx.gateway, ctx.user_id, profile.plan, today).await;

    let email = ctx
        .settings
        .session
        .as_ref()
        .map(|s| s.email.clone())
        .unwrap_or_default();
    let start_tour = force_tour || !profile.onboarding_completed;
    let mut dashboard =
        Dashboard::new(repo, profile, receipts, usage, accounts, &email, start_tour);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                dashboard.handle_key(key.code);
                if dashboard.quit {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
