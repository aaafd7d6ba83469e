use tracing::{debug, info};

use crate::capture::extractor::extract_credential;
use crate::observer::subscription::{FormSubscriptionManager, InsertionScan};
use crate::page::document::NodeId;
use crate::page::host::{ListenerId, PageEvent, PageHost};
use crate::sink::sink::AutofillSink;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

/// Connects a page to the credential heuristic and the autofill sink.
///
/// Structural changes go to the [`FormSubscriptionManager`]; submit events
/// on forms it wired are run through [`extract_credential`] and, when a
/// password was found, forwarded to the sink.
pub struct AutofillObserver {
    subscriptions: FormSubscriptionManager,
    sink: Box<dyn AutofillSink>,
    tracer: TraceLogger,
}

impl AutofillObserver {
    pub fn new(scan: InsertionScan, sink: impl AutofillSink + 'static, tracer: TraceLogger) -> Self {
        Self {
            subscriptions: FormSubscriptionManager::new(scan),
            sink: Box::new(sink),
            tracer,
        }
    }

    /// Build an observer and wire it into `host`. Call once the document is ready.
    pub fn install(
        host: &mut dyn PageHost,
        scan: InsertionScan,
        sink: impl AutofillSink + 'static,
        tracer: TraceLogger,
    ) -> Self {
        let mut observer = Self::new(scan, sink, tracer);
        observer.subscriptions.install(host);

        for form in host.forms() {
            if observer.subscriptions.is_attached(form) {
                observer.trace_attached(host.location(), form);
            }
        }
        debug!(
            url = host.location(),
            forms = observer.subscriptions.attached_count(),
            "autofill observer installed"
        );
        observer
    }

    pub fn subscriptions(&self) -> &FormSubscriptionManager {
        &self.subscriptions
    }

    /// Handle one host event. Returns whether a credential was forwarded.
    pub fn dispatch(&mut self, host: &mut dyn PageHost, event: PageEvent) -> bool {
        match event {
            PageEvent::Mutations { observer, records } => {
                if self.subscriptions.observer() != Some(observer) {
                    return false;
                }
                let attached = self.subscriptions.handle_mutations(host, &records);
                for form in attached {
                    self.trace_attached(host.location(), form);
                }
                false
            }
            PageEvent::Submit { form, listener } => self.handle_submit(&*host, form, listener),
        }
    }

    /// Process events until the host is idle. Returns the number of events handled.
    pub fn run_until_idle(&mut self, host: &mut dyn PageHost) -> usize {
        let mut handled = 0;
        while let Some(event) = host.next_event() {
            self.dispatch(host, event);
            handled += 1;
        }
        handled
    }

    pub fn detach(&mut self, host: &mut dyn PageHost) {
        self.subscriptions.detach(host);
        debug!(url = host.location(), "autofill observer detached");
    }

    fn handle_submit(&self, host: &dyn PageHost, form: NodeId, listener: ListenerId) -> bool {
        if !self.subscriptions.owns_listener(listener) {
            return false;
        }

        let origin = host.location();
        let fields = host.form_fields(form);

        match extract_credential(origin, &fields) {
            Some(credential) => {
                info!(
                    url = origin,
                    form = form.0,
                    has_username = !credential.username.is_empty(),
                    "captured credential"
                );
                self.tracer.log(
                    &TraceEvent::now(TraceKind::Captured, origin)
                        .with_form(form)
                        .with_credential(&credential),
                );
                self.sink.on_form_submitted(credential);
                true
            }
            None => {
                debug!(url = origin, form = form.0, "no password value, nothing captured");
                self.tracer.log(
                    &TraceEvent::now(TraceKind::Suppressed, origin)
                        .with_form(form)
                        .with_suppression("no password value"),
                );
                false
            }
        }
    }

    fn trace_attached(&self, url: &str, form: NodeId) {
        self.tracer
            .log(&TraceEvent::now(TraceKind::FormAttached, url).with_form(form));
    }
}
