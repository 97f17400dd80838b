//! Subcommand handlers.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use feederdash_adapter_http_reqwest::ReqwestFeederApi;
use feederdash_adapter_virtual::VirtualFeeder;
use feederdash_app::session::{DashboardSession, PollOutcome};
use feederdash_domain::command::Command;
use feederdash_domain::config::ConfigForm;
use feederdash_domain::reply::Ack;
use feederdash_domain::toast::{TOAST_DURATION, Toast};
use feederdash_domain::view::DashboardView;

use crate::cli::LineCommand;
use crate::photo_store::DirectoryPhotoStore;
use crate::render;

pub type Session = DashboardSession<ReqwestFeederApi, DirectoryPhotoStore>;

/// Line input (stdin by default), for line commands and confirmation prompts.
pub struct Terminal<R = BufReader<Stdin>> {
    lines: Lines<R>,
    assume_yes: bool,
    prompt: Option<watch::Sender<Option<String>>>,
}

impl Terminal {
    pub fn new(assume_yes: bool) -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()), assume_yes)
    }
}

impl<R: AsyncBufRead + Unpin> Terminal<R> {
    pub fn from_reader(reader: R, assume_yes: bool) -> Self {
        Self {
            lines: reader.lines(),
            assume_yes,
            prompt: None,
        }
    }

    /// Route prompts through the live panel instead of writing them inline.
    fn attach_prompt(&mut self, prompt: watch::Sender<Option<String>>) {
        self.prompt = Some(prompt);
    }

    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }

    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    async fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let question = format!("{question} [y/N] ");
        match &self.prompt {
            Some(prompt) => {
                prompt.send_replace(Some(question));
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(question.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        let answer = self.next_line().await?.unwrap_or_default();
        if let Some(prompt) = &self.prompt {
            prompt.send_replace(None);
        }
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

fn drain_toasts(toasts: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
    let mut drained = Vec::new();
    while let Ok(toast) = toasts.try_recv() {
        drained.push(toast);
    }
    drained
}

fn print_toasts(toasts: &mut broadcast::Receiver<Toast>) -> bool {
    let drained = drain_toasts(toasts);
    for toast in &drained {
        println!("{}", render::toast(toast));
    }
    drained.iter().any(Toast::is_error)
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_command(session: &Session, command: Command) -> Option<Ack> {
    let result = match command {
        Command::FeedNow => session.feed_now().await,
        Command::CancelFeeding => session.cancel_feeding().await,
        Command::ResetDaily => session.reset_daily().await,
        Command::Reboot => session
            .reboot()
            .await
            .map(|()| Ack::ok(Command::Reboot.success_text())),
    };
    result.ok()
}

/// `feederdash status`
pub async fn status(session: &Session) -> anyhow::Result<ExitCode> {
    match session.poll_once().await {
        PollOutcome::Updated => {
            println!("{}", render::panel(&session.view()));
            Ok(ExitCode::SUCCESS)
        }
        PollOutcome::Declined => {
            println!("The feeder declined the status request.");
            Ok(ExitCode::FAILURE)
        }
        PollOutcome::Failed => anyhow::bail!("feeder is unreachable"),
    }
}

/// `feederdash feed | cancel | reset-daily | reboot`
///
/// A reboot's deferred effects belong to a live dashboard; here the process
/// exits once the request is answered.
pub async fn command<R: AsyncBufRead + Unpin>(
    session: &Session,
    terminal: &mut Terminal<R>,
    command: Command,
) -> anyhow::Result<ExitCode> {
    if !terminal.confirm(command.confirmation()).await? {
        println!("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }
    let mut toasts = session.subscribe_toasts();
    let ack = run_command(session, command).await;
    let toasted_error = print_toasts(&mut toasts);
    Ok(exit_code(toasted_error || !ack.is_some_and(|ack| ack.success)))
}

/// `feederdash capture`
pub async fn capture(session: &Session) -> anyhow::Result<ExitCode> {
    let mut toasts = session.subscribe_toasts();
    let result = session.capture_photo().await;
    print_toasts(&mut toasts);
    match result {
        Ok(path) => {
            println!("{path}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err).context("photo capture failed"),
    }
}

/// `feederdash config show`
pub async fn config_show(session: &Session) -> anyhow::Result<ExitCode> {
    session
        .load_configuration()
        .await
        .context("failed to load configuration")?;
    println!("{}", render::config(&session.form()));
    Ok(ExitCode::SUCCESS)
}

/// Which config group to save, with the fields to change.
pub enum ConfigEdit {
    Schedule {
        auto: Option<bool>,
        interval: Option<String>,
        portions: Option<String>,
    },
    Advanced {
        presence: Option<bool>,
        sound: Option<bool>,
        temp_alerts: Option<bool>,
        humidity_alerts: Option<bool>,
    },
}

impl ConfigEdit {
    fn apply(self, form: &mut ConfigForm) {
        match self {
            Self::Schedule {
                auto,
                interval,
                portions,
            } => {
                if let Some(auto) = auto {
                    form.auto_enabled = auto;
                }
                if let Some(interval) = interval {
                    form.feeding_interval = interval;
                }
                if let Some(portions) = portions {
                    form.portions_per_day = portions;
                }
            }
            Self::Advanced {
                presence,
                sound,
                temp_alerts,
                humidity_alerts,
            } => {
                if let Some(presence) = presence {
                    form.require_presence = presence;
                }
                if let Some(sound) = sound {
                    form.play_sound = sound;
                }
                if let Some(temp_alerts) = temp_alerts {
                    form.temp_alerts = temp_alerts;
                }
                if let Some(humidity_alerts) = humidity_alerts {
                    form.humidity_alerts = humidity_alerts;
                }
            }
        }
    }
}

/// `feederdash config schedule | advanced`
///
/// Loads the device configuration first so unset flags keep their values.
pub async fn config_save(session: &Session, edit: ConfigEdit) -> anyhow::Result<ExitCode> {
    session
        .load_configuration()
        .await
        .context("failed to load configuration")?;
    let schedule = matches!(edit, ConfigEdit::Schedule { .. });
    session.edit_form(|form| edit.apply(form));

    let mut toasts = session.subscribe_toasts();
    let result = if schedule {
        session.save_schedule().await
    } else {
        session.save_advanced().await
    };
    let toasted_error = print_toasts(&mut toasts);
    Ok(exit_code(toasted_error || result.is_err()))
}

fn draw(view: &DashboardView, toast: Option<&Toast>, prompt: Option<&str>) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{}{}\n\n", render::CLEAR, render::panel(view));
    if let Some(toast) = toast {
        let _ = writeln!(stdout, "{}", render::toast(toast));
    }
    let _ = writeln!(stdout, "{}", LineCommand::HELP);
    if let Some(prompt) = prompt {
        let _ = write!(stdout, "{prompt}");
    }
    let _ = stdout.flush();
}

/// Redraw on every view change, toast or prompt. A toast stays on screen for
/// [`TOAST_DURATION`] or until the next one replaces it.
async fn render_loop(
    views: watch::Receiver<DashboardView>,
    toasts: broadcast::Receiver<Toast>,
    mut prompts: watch::Receiver<Option<String>>,
) {
    let mut views = WatchStream::new(views);
    let mut toasts = BroadcastStream::new(toasts);
    let mut view = DashboardView::default();
    let mut shown: Option<(Toast, Instant)> = None;

    loop {
        let prompt = prompts.borrow_and_update().clone();
        draw(&view, shown.as_ref().map(|(toast, _)| toast), prompt.as_deref());
        let hide_at = shown.as_ref().map(|(_, at)| *at);
        let hide = tokio::time::sleep_until(hide_at.unwrap_or_else(Instant::now));

        tokio::select! {
            next = views.next() => match next {
                Some(next) => view = next,
                None => break,
            },
            next = toasts.next() => match next {
                Some(Ok(toast)) => shown = Some((toast, Instant::now() + TOAST_DURATION)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::debug!(skipped, "toast renderer lagged");
                }
                None => break,
            },
            changed = prompts.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            () = hide, if hide_at.is_some() => {
                shown = None;
            }
        }
    }
}

async fn handle_line<R: AsyncBufRead + Unpin>(
    session: &Session,
    terminal: &mut Terminal<R>,
    line: LineCommand,
) -> anyhow::Result<()> {
    let command = match line {
        LineCommand::Feed => Command::FeedNow,
        LineCommand::Cancel => Command::CancelFeeding,
        LineCommand::ResetDaily => Command::ResetDaily,
        LineCommand::Reboot => Command::Reboot,
        LineCommand::Capture => {
            let _ = session.capture_photo().await;
            return Ok(());
        }
        LineCommand::RefreshCamera => {
            let _ = session.refresh_camera().await;
            return Ok(());
        }
        LineCommand::Help | LineCommand::Quit => return Ok(()),
    };
    if terminal.confirm(command.confirmation()).await? {
        run_command(session, command).await;
    }
    Ok(())
}

/// `feederdash watch` — the live dashboard.
pub async fn watch<R: AsyncBufRead + Unpin>(
    session: &Session,
    terminal: &mut Terminal<R>,
) -> anyhow::Result<ExitCode> {
    let (prompt_tx, prompt_rx) = watch::channel(None);
    terminal.attach_prompt(prompt_tx);

    let renderer = tokio::spawn(render_loop(
        session.subscribe_view(),
        session.subscribe_toasts(),
        prompt_rx,
    ));
    session.start().await;

    loop {
        tokio::select! {
            line = terminal.next_line() => {
                let Some(line) = line? else { break };
                match LineCommand::parse(&line) {
                    None | Some(Ok(LineCommand::Help)) => {}
                    Some(Ok(LineCommand::Quit)) => break,
                    Some(Ok(command)) => handle_line(session, terminal, command).await?,
                    Some(Err(unknown)) => tracing::info!("{unknown}; {}", LineCommand::HELP),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.stop();
    renderer.abort();
    println!();
    Ok(ExitCode::SUCCESS)
}

/// `feederdash demo` — serve a virtual feeder until interrupted.
pub async fn demo(bind: &str, camera: bool) -> anyhow::Result<ExitCode> {
    let feeder = feederdash_adapter_virtual::shared(VirtualFeeder::default().with_camera(camera));
    let app = feederdash_adapter_virtual::build(feeder);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(address = %listener.local_addr()?, camera, "virtual feeder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    tracing::info!("virtual feeder stopped");
    Ok(ExitCode::SUCCESS)
}

/// Resolve the capture directory, CLI override first.
pub fn capture_dir(configured: PathBuf, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or(configured)
}
