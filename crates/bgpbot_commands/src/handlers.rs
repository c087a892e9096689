//! Command handlers: validate, look up through the cache, classify.

use crate::{
    Argument, ClassifiedResult, CommandError, CommandErrorKind, CommandKind, CommandResult,
    LookupContext, cache_key, validate,
};
use bgpbot_client::UpstreamReply;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Text shown for any upstream availability failure.
pub const UPSTREAM_UNAVAILABLE: &str = "unable to query the bgpstuff.net API";

/// Text shown when a command hits an internal inconsistency.
pub const INTERNAL_ERROR: &str = "unable to handle that command";

const INVALIDS_BULK_KEY: &str = "invalids:all";

/// Resolves commands against the upstream through per-command caches.
///
/// One generic path serves every [`CommandKind`]: validation depends on the
/// command's argument kind, the upstream operation and message template on
/// the kind itself. Only successful lookups (including "not found"
/// warnings) are cached.
#[derive(Clone)]
pub struct CommandHandlers {
    context: Arc<LookupContext>,
}

impl CommandHandlers {
    /// Create handlers over a shared context.
    pub fn new(context: Arc<LookupContext>) -> Self {
        Self { context }
    }

    /// The shared lookup context.
    pub fn context(&self) -> &LookupContext {
        &self.context
    }

    /// Answer one command.
    ///
    /// Always yields exactly one classified outcome. Invalid arguments fail
    /// without touching the cache or the upstream.
    #[instrument(skip(self, args), fields(command = %kind, arg_count = args.len()))]
    pub async fn handle(&self, kind: CommandKind, args: &[&str]) -> ClassifiedResult {
        let argument = match validate(kind.command().argument(), args.first().copied()) {
            Ok(argument) => argument,
            Err(e) => {
                debug!(error = %e, "Rejected command argument");
                return ClassifiedResult::from(&e);
            }
        };

        match self.resolve(kind, argument).await {
            Ok(result) => {
                info!(severity = %result.severity(), "Command answered");
                result
            }
            Err(e) if e.is_incident() => {
                error!(error = %e, "Command failed");
                ClassifiedResult::from(&e)
            }
            Err(e) => {
                debug!(error = %e, "Command refused");
                ClassifiedResult::from(&e)
            }
        }
    }

    async fn resolve(
        &self,
        kind: CommandKind,
        argument: Argument,
    ) -> CommandResult<ClassifiedResult> {
        let cache = self.context.cache(kind)?;
        let key = cache_key(kind, &argument);
        cache
            .get_or_compute(key, || async {
                match self.lookup(kind, &argument).await {
                    Err(CommandError {
                        kind: CommandErrorKind::NotFound(text),
                        ..
                    }) => Ok(ClassifiedResult::warning(text)),
                    other => other,
                }
            })
            .await
    }

    /// Upstream call and message template for each command.
    async fn lookup(
        &self,
        kind: CommandKind,
        argument: &Argument,
    ) -> CommandResult<ClassifiedResult> {
        let client = self.context.client();
        match (kind, argument) {
            (CommandKind::Route, Argument::Prefix(prefix)) => {
                let route = found(client.route(prefix).await?, || no_prefix(prefix))?;
                Ok(ClassifiedResult::success(format!(
                    "The route for {} is {}",
                    prefix, route
                )))
            }
            (CommandKind::Origin, Argument::Prefix(prefix)) => {
                let origin = found(client.origin(prefix).await?, || no_prefix(prefix))?;
                Ok(ClassifiedResult::success(format!(
                    "The origin AS for {} is AS{}",
                    prefix, origin
                )))
            }
            (CommandKind::AsPath, Argument::Prefix(prefix)) => {
                let path = found(client.as_path(prefix).await?, || no_prefix(prefix))?;
                let path = path
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(ClassifiedResult::success(format!(
                    "The AS path for {} is {}",
                    prefix, path
                )))
            }
            (CommandKind::Roa, Argument::Prefix(prefix)) => {
                let status = found(client.roa(prefix).await?, || no_prefix(prefix))?;
                let status = if status == "UNKNOWN" {
                    "UNKNOWN (NO ROA)".to_string()
                } else {
                    status
                };
                Ok(ClassifiedResult::success(format!(
                    "The ROA status for {} is {}",
                    prefix, status
                )))
            }
            (CommandKind::GeoIp, Argument::Prefix(prefix)) => {
                let location = found(client.geo_ip(prefix).await?, || no_prefix(prefix))?;
                Ok(ClassifiedResult::success(format!(
                    "{} might be located in {}, {}",
                    prefix, location.city, location.country
                )))
            }
            (CommandKind::AsName, Argument::AsNumber(asn)) => {
                let name = found(client.as_name(*asn).await?, || {
                    format!("No AS name exists for {}", asn)
                })?;
                Ok(ClassifiedResult::success(format!(
                    "The AS name for {} is {}",
                    asn, name
                )))
            }
            (CommandKind::Invalids, Argument::AsNumber(asn)) => self.invalids_for(*asn).await,
            (CommandKind::Vrps, Argument::AsNumber(asn)) => {
                let no_vrps = || format!("AS{} has no VRPs", asn);
                let vrps = found(client.vrps(*asn).await?, no_vrps)?;
                if vrps.is_empty() {
                    return Err(not_found(no_vrps()));
                }
                Ok(ClassifiedResult::success(listing(
                    format!("AS{} has the following VRPs:", asn),
                    &vrps,
                )))
            }
            (CommandKind::Sourced, Argument::AsNumber(asn)) => {
                let none_sourced = || format!("AS{} is not sourcing any prefixes", asn);
                let prefixes = found(client.sourced(*asn).await?, none_sourced)?;
                if prefixes.is_empty() {
                    return Err(not_found(none_sourced()));
                }
                Ok(ClassifiedResult::success(listing(
                    format!("AS{} is sourcing the following prefixes:", asn),
                    &prefixes,
                )))
            }
            (CommandKind::Totals, Argument::None) => {
                let totals = payload(client.totals().await?)?;
                Ok(ClassifiedResult::success(format!(
                    "I see {} IPv4 and {} IPv6 prefixes active",
                    totals.ipv4, totals.ipv6
                )))
            }
            (kind, argument) => Err(CommandError::new(CommandErrorKind::InternalInconsistency(
                format!("{} cannot take argument {:?}", kind, argument),
            ))),
        }
    }

    /// Filter the bulk invalids table, fetched at most once per its TTL.
    async fn invalids_for(&self, asn: u32) -> CommandResult<ClassifiedResult> {
        let all = self
            .context
            .invalids_bulk()
            .get_or_compute(INVALIDS_BULK_KEY.to_string(), || async {
                debug!("Fetching all invalids from upstream");
                let table = payload(self.context.client().invalids().await?)?;
                Ok::<_, CommandError>(Arc::new(table))
            })
            .await?;

        match all.get(&asn) {
            Some(prefixes) if !prefixes.is_empty() => Ok(ClassifiedResult::warning(listing(
                format!("AS{} is originating the following invalid prefixes:", asn),
                prefixes,
            ))),
            _ => Ok(ClassifiedResult::success(format!(
                "AS{} is not originating any invalid prefixes",
                asn
            ))),
        }
    }
}

/// Payload of a 200 reply, regardless of the existence flag.
#[track_caller]
fn payload<T>(reply: UpstreamReply<T>) -> CommandResult<T> {
    if !reply.is_ok() {
        return Err(CommandError::new(CommandErrorKind::UpstreamUnavailable(
            format!("upstream returned status {}", reply.status()),
        )));
    }
    reply.into_data().ok_or_else(|| {
        CommandError::new(CommandErrorKind::UpstreamUnavailable(
            "reply carried no data".to_string(),
        ))
    })
}

/// Payload of a 200 reply for an entity the upstream says exists.
#[track_caller]
fn found<T>(reply: UpstreamReply<T>, missing: impl FnOnce() -> String) -> CommandResult<T> {
    if reply.is_ok() && !*reply.exists() {
        return Err(not_found(missing()));
    }
    payload(reply)
}

#[track_caller]
fn not_found(text: String) -> CommandError {
    CommandError::new(CommandErrorKind::NotFound(text))
}

fn no_prefix(prefix: &str) -> String {
    format!("No prefix exists for {}", prefix)
}

/// Header followed by one tab-indented line per item.
fn listing<T: Display>(header: String, items: &[T]) -> String {
    let mut text = header;
    for item in items {
        text.push_str("\n\t");
        text.push_str(&item.to_string());
    }
    text
}
