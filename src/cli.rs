//! Terminal front-end — walks the registration flow over stdin/stdout.
//!
//! Each step is driven by its controller; the session only renders prompts
//! and follows the navigator. State persisted by earlier runs is picked up,
//! so an interrupted flow resumes at the step it left off.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::api::{HttpRegistrationApi, RegistrationApi};
use crate::config::ClientConfig;
use crate::countries::Country;
use crate::error::{NavigationError, Result};
use crate::navigation::{Navigator, Step};
use crate::notify::{Notification, Notifier};
use crate::otp::{
    ConfirmOutcome, OtpConfirmController, OtpMethod, OtpSendController, SendOutcome,
};
use crate::phone::FilteredCountries;
use crate::phone::selector::NO_COUNTRIES_FOUND;
use crate::registration::{Field, Gender, RegistrationController, SubmitOutcome};
use crate::store::{FileStore, KeyValueStore, keys};

/// Navigator that just remembers where the flow is.
pub struct TerminalNavigator {
    current: Mutex<Step>,
}

impl TerminalNavigator {
    pub fn new(start: Step) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn current(&self) -> Step {
        self.current.lock().map(|s| *s).unwrap_or(Step::Register)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, step: Step) -> std::result::Result<(), NavigationError> {
        let mut current = self.current.lock().map_err(|_| NavigationError::Failed {
            step: step.to_string(),
            reason: "navigator state poisoned".into(),
        })?;
        tracing::debug!(from = %*current, to = %step, path = step.path(), "Navigate");
        *current = step;
        Ok(())
    }
}

/// Prints notifications to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(msg) => eprintln!("✅ {msg}"),
            Notification::Error(msg) => eprintln!("❌ {msg}"),
        }
    }
}

/// Where a previous run left off, judged by what is persisted.
pub async fn resume_step(store: &dyn KeyValueStore) -> Result<Step> {
    if store.get(keys::OTP_METHOD).await?.is_some() {
        Ok(Step::OtpConfirm)
    } else if store.get(keys::REGISTRATION_DATA).await?.is_some() {
        Ok(Step::OtpMethod)
    } else {
        Ok(Step::Register)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Verification succeeded with this server message.
    Registered(String),
    /// Input closed or the user typed `/quit`.
    Aborted,
}

enum Flow {
    Continue,
    End(SessionEnd),
}

/// Interactive run of the flow over a line reader and a writer.
pub struct Session<R, W> {
    lines: Lines<R>,
    out: W,
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn RegistrationApi>,
    navigator: Arc<TerminalNavigator>,
    notifier: Arc<dyn Notifier>,
    default_country: &'static Country,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        reader: R,
        out: W,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn RegistrationApi>,
        navigator: Arc<TerminalNavigator>,
        notifier: Arc<dyn Notifier>,
        default_country: &'static Country,
    ) -> Self {
        Self {
            lines: reader.lines(),
            out,
            store,
            api,
            navigator,
            notifier,
            default_country,
        }
    }

    /// Wire a terminal session from config: file-backed state, the HTTP
    /// backend, and the step the persisted state points at.
    pub async fn from_config(config: &ClientConfig, reader: R, out: W) -> Result<Self> {
        let api = HttpRegistrationApi::from_config(config)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.store_path.clone()));
        let start = resume_step(store.as_ref()).await?;
        tracing::info!(%start, store = %config.store_path.display(), "Starting registration flow");

        Ok(Self::new(
            reader,
            out,
            store,
            Arc::new(api),
            Arc::new(TerminalNavigator::new(start)),
            Arc::new(TerminalNotifier),
            config.default_country,
        ))
    }

    /// Run until registration completes or input ends.
    pub async fn run(&mut self) -> Result<SessionEnd> {
        loop {
            let step = self.navigator.current();
            tracing::debug!(%step, "Entering step");
            let flow = match step {
                Step::Register => self.register_step().await?,
                Step::OtpMethod => self.method_step().await?,
                Step::OtpConfirm => self.confirm_step().await?,
            };
            if let Flow::End(end) = flow {
                return Ok(end);
            }
        }
    }

    /// Prompt for one line. `None` on EOF or `/quit`.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line
            .map(|l| l.trim().to_string())
            .filter(|l| l != "/quit"))
    }

    async fn register_step(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n— Create your account —")?;
        let mut ctrl = RegistrationController::new(
            self.store.clone(),
            self.navigator.clone(),
            self.default_country,
        );

        let mut pending: Vec<Field> = Field::ALL.to_vec();
        loop {
            for field in pending.clone() {
                if !self.prompt_field(&mut ctrl, field).await? {
                    return Ok(Flow::End(SessionEnd::Aborted));
                }
            }

            match ctrl.submit().await {
                SubmitOutcome::Saved(_) => return Ok(Flow::Continue),
                SubmitOutcome::Invalid(errors) => {
                    writeln!(self.out, "Please fix the following:")?;
                    for (field, msg) in errors.iter() {
                        writeln!(self.out, "  • {msg}")?;
                        tracing::debug!(%field, "Invalid field");
                    }
                    pending = errors.iter().map(|(f, _)| f).collect();
                    // Picking a country again clears the phone number.
                    if pending.contains(&Field::Country) && !pending.contains(&Field::Phone) {
                        pending.push(Field::Phone);
                    }
                }
                SubmitOutcome::Failed(reason) => {
                    writeln!(self.out, "Could not save your details ({reason}).")?;
                    if self.prompt("Press Enter to try again").await?.is_none() {
                        return Ok(Flow::End(SessionEnd::Aborted));
                    }
                    pending.clear();
                }
            }
        }
    }

    /// Prompt for one field. Returns `false` when the user quit.
    async fn prompt_field(
        &mut self,
        ctrl: &mut RegistrationController,
        field: Field,
    ) -> Result<bool> {
        let label = match field {
            Field::Country => return self.choose_country(ctrl).await,
            Field::FirstName => "First name".to_string(),
            Field::LastName => "Last name".to_string(),
            Field::Gender => "Gender (male/female/other)".to_string(),
            Field::Email => "Email".to_string(),
            Field::Phone => format!(
                "Phone {} (e.g. {})",
                ctrl.phone().country().dial_code,
                ctrl.phone().placeholder()
            ),
            Field::AcceptTerms => "Accept the terms and conditions? (y/n)".to_string(),
        };
        let Some(value) = self.prompt(&label).await? else {
            return Ok(false);
        };

        let form = ctrl.form_mut();
        match field {
            Field::FirstName => form.first_name = value,
            Field::LastName => form.last_name = value,
            Field::Gender => form.gender = Gender::parse(&value),
            Field::Email => form.email = value,
            Field::AcceptTerms => {
                form.accept_terms = Some(matches!(value.to_lowercase().as_str(), "y" | "yes"));
            }
            Field::Phone => {
                let formatted = ctrl.input_phone(&value);
                writeln!(self.out, "  → {formatted}")?;
            }
            Field::Country => {}
        }
        Ok(true)
    }

    async fn choose_country(&mut self, ctrl: &mut RegistrationController) -> Result<bool> {
        loop {
            let current = ctrl.phone().country();
            let label = format!("Country (name, ISO code or dial code) [{}]", current.name);
            let Some(term) = self.prompt(&label).await? else {
                return Ok(false);
            };
            if term.is_empty() {
                ctrl.change_country(current);
                return Ok(true);
            }

            let matches = match ctrl.search_countries(&term) {
                FilteredCountries::Matches(matches) => matches,
                FilteredCountries::Empty => {
                    writeln!(self.out, "  {NO_COUNTRIES_FOUND}")?;
                    continue;
                }
            };
            let exact = matches
                .iter()
                .find(|c| c.code.eq_ignore_ascii_case(&term) || c.name.eq_ignore_ascii_case(&term))
                .copied();

            let picked = match (exact, matches.as_slice()) {
                (Some(country), _) => Some(country),
                (None, [only]) => Some(*only),
                (None, many) => {
                    for (i, c) in many.iter().enumerate() {
                        writeln!(self.out, "  {}) {} ({} {})", i + 1, c.name, c.code, c.dial_code)?;
                    }
                    let Some(choice) = self.prompt("Number").await? else {
                        return Ok(false);
                    };
                    choice
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| many.get(i).copied())
                }
            };

            match picked {
                Some(country) => {
                    ctrl.change_country(country);
                    return Ok(true);
                }
                None => writeln!(self.out, "  Please pick one of the listed numbers.")?,
            }
        }
    }

    async fn method_step(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n— Verify your contact details —")?;
        let mut ctrl = OtpSendController::load(
            self.store.clone(),
            self.api.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
        )
        .await;

        loop {
            let contact = ctrl.contact().clone();
            writeln!(self.out, "Where should we send your code?")?;
            writeln!(self.out, "  1) Email ({})", contact.email)?;
            writeln!(self.out, "  2) Phone ({})", contact.phone)?;
            let Some(choice) = self.prompt("Choice").await? else {
                return Ok(Flow::End(SessionEnd::Aborted));
            };
            let method = match choice.to_lowercase().as_str() {
                "1" | "email" => Some(OtpMethod::Email),
                "2" | "phone" => Some(OtpMethod::Phone),
                _ => None,
            };
            ctrl.select_method(method);

            match ctrl.next().await {
                SendOutcome::Sent { .. } => return Ok(Flow::Continue),
                SendOutcome::MethodRequired | SendOutcome::Failed => {
                    if let Some(msg) = ctrl.message() {
                        writeln!(self.out, "  {msg}")?;
                    }
                }
            }
        }
    }

    async fn confirm_step(&mut self) -> Result<Flow> {
        let ctrl =
            OtpConfirmController::load(self.store.clone(), self.api.clone(), self.notifier.clone())
                .await;
        writeln!(
            self.out,
            "\nEnter the 4-digit code sent to your {}. Type /resend for a new code.",
            ctrl.method()
        )?;

        loop {
            let Some(line) = self.prompt("Code").await? else {
                return Ok(Flow::End(SessionEnd::Aborted));
            };
            if line == "/resend" {
                ctrl.resend().await;
                continue;
            }

            ctrl.paste(0, &line).await;
            match ctrl.submit().await {
                ConfirmOutcome::Done(msg) => return Ok(Flow::End(SessionEnd::Registered(msg))),
                ConfirmOutcome::Incomplete => {
                    writeln!(self.out, "  Please enter all 4 digits.")?;
                }
                ConfirmOutcome::Busy | ConfirmOutcome::Failed => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use crate::testing::{ApiCall, RecordingNotifier, ScriptedApi, ok, status};

    struct Run {
        end: SessionEnd,
        output: String,
        store: Arc<MemoryStore>,
        api: Arc<ScriptedApi>,
    }

    async fn run_session(store: Arc<MemoryStore>, api: ScriptedApi, input: &str) -> Run {
        let api = Arc::new(api);
        let start = resume_step(store.as_ref()).await.unwrap();
        let navigator = Arc::new(TerminalNavigator::new(start));
        let mut out = Vec::new();
        let end = {
            let mut session = Session::new(
                input.as_bytes(),
                &mut out,
                store.clone(),
                api.clone(),
                navigator,
                Arc::new(RecordingNotifier::default()),
                countries::default_country(),
            );
            session.run().await.unwrap()
        };
        Run {
            end,
            output: String::from_utf8(out).unwrap(),
            store,
            api,
        }
    }

    const HAPPY_INPUT: &str =
        "Ada\nLovelace\nfemale\ngb\nada@example.com\n7911123456\ny\n2\n12\n1234\n";

    #[tokio::test]
    async fn full_flow_registers_and_clears_storage() {
        let store = Arc::new(MemoryStore::new());
        let run = run_session(store, ScriptedApi::default(), HAPPY_INPUT).await;

        assert_eq!(
            run.end,
            SessionEnd::Registered("Registration completed successfully".into())
        );
        assert!(run.output.contains("→ 7911 123 456"));
        assert!(run.output.contains("Please enter all 4 digits."));
        assert!(run.store.is_empty().await);

        let calls = run.api.calls();
        assert_eq!(calls[0], ApiCall::SendPhone("7911 123 456".into()));
        let ApiCall::Verify { code, method, registration } = &calls[1] else {
            panic!("expected verify call");
        };
        assert_eq!(code, "1234");
        assert_eq!(*method, OtpMethod::Phone);
        assert_eq!(registration["country"], "GB");
        assert_eq!(registration["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn invalid_fields_are_asked_again() {
        let input = "A\nLovelace\nfemale\ngb\nada@example.com\n7911123456\ny\nAda\n1\n1234\n";
        let run = run_session(Arc::new(MemoryStore::new()), ScriptedApi::default(), input).await;

        assert!(run.output.contains("First name must be at least 2 characters"));
        assert!(matches!(run.end, SessionEnd::Registered(_)));
        assert_eq!(run.api.calls()[0], ApiCall::SendEmail("ada@example.com".into()));
    }

    #[tokio::test]
    async fn ambiguous_country_offers_a_list() {
        let input = "Ada\nLovelace\nfemale\n+1\n2\nada@example.com\n6135550123\ny\n";
        let store = Arc::new(MemoryStore::new());
        let run = run_session(store, ScriptedApi::default(), input).await;

        // Input ends on the method step.
        assert_eq!(run.end, SessionEnd::Aborted);
        assert!(run.output.contains("1) United States"));
        let saved = run.store.get(keys::REGISTRATION_DATA).await.unwrap().unwrap();
        assert!(saved.contains("\"country\":\"CA\""));
        assert!(saved.contains("(613) 555-0123"));
    }

    #[tokio::test]
    async fn unknown_country_reports_no_match() {
        let input = "Ada\nLovelace\nfemale\natlantis\n";
        let run = run_session(Arc::new(MemoryStore::new()), ScriptedApi::default(), input).await;
        assert!(run.output.contains(NO_COUNTRIES_FOUND));
        assert_eq!(run.end, SessionEnd::Aborted);
    }

    #[tokio::test]
    async fn resumes_at_confirmation_and_resends() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::REGISTRATION_DATA, r#"{"email":"ada@example.com","phone":"7911 123 456"}"#)
            .await
            .unwrap();
        store.set(keys::OTP_METHOD, "\"email\"").await.unwrap();

        let api = ScriptedApi::with(vec![ok("New code on its way"), ok("Welcome")]);
        let run = run_session(store, api, "/resend\n5678\n").await;

        assert_eq!(run.end, SessionEnd::Registered("Welcome".into()));
        assert_eq!(run.api.calls()[0], ApiCall::Resend(OtpMethod::Email));
    }

    #[tokio::test]
    async fn send_failure_lets_user_retry() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::REGISTRATION_DATA, r#"{"email":"ada@example.com","phone":""}"#)
            .await
            .unwrap();

        let api = ScriptedApi::with(vec![status(502)]);
        let run = run_session(store, api, "9\n1\n1\n").await;

        assert!(run.output.contains("Please select a verification method"));
        assert!(run.output.contains("Failed to send OTP. Please try again."));
        // Second attempt succeeded and moved on; input then ran out.
        assert_eq!(run.end, SessionEnd::Aborted);
        assert_eq!(run.api.calls().len(), 2);
        assert!(run.store.get(keys::OTP_METHOD).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn quit_aborts() {
        let store = Arc::new(MemoryStore::new());
        let run = run_session(store, ScriptedApi::default(), "/quit\n").await;
        assert_eq!(run.end, SessionEnd::Aborted);
    }

    #[tokio::test]
    async fn resume_step_follows_persisted_keys() {
        let store = MemoryStore::new();
        assert_eq!(resume_step(&store).await.unwrap(), Step::Register);
        store.set(keys::REGISTRATION_DATA, "{}").await.unwrap();
        assert_eq!(resume_step(&store).await.unwrap(), Step::OtpMethod);
        store.set(keys::OTP_METHOD, "\"phone\"").await.unwrap();
        assert_eq!(resume_step(&store).await.unwrap(), Step::OtpConfirm);
    }

    #[tokio::test]
    async fn from_config_resumes_from_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            store_path: dir.path().join("state.json"),
            ..ClientConfig::default()
        };
        FileStore::new(&config.store_path)
            .set(keys::REGISTRATION_DATA, r#"{"email":"ada@example.com","phone":""}"#)
            .await
            .unwrap();

        let mut out = Vec::new();
        let end = {
            let mut session = Session::from_config(&config, "/quit\n".as_bytes(), &mut out)
                .await
                .unwrap();
            session.run().await.unwrap()
        };

        assert_eq!(end, SessionEnd::Aborted);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("1) Email (ada@example.com)"));
    }

    #[tokio::test]
    async fn from_config_reports_unreadable_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the state file should be.
        let config = ClientConfig {
            store_path: dir.path().to_path_buf(),
            ..ClientConfig::default()
        };

        let result = Session::from_config(&config, "".as_bytes(), Vec::new()).await;

        assert!(matches!(
            result,
            Err(crate::error::Error::Store(StoreError::Read { .. }))
        ));
    }
}
