use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};
use heapless::String;
use log::{debug, info};
use sylabik_core::{
    app::{SYLLABIFY_TEXT_BYTES, SyllabifyRequest, SyllabifyTicket},
    content::UpstreamError,
};

use super::{RequestSignal, ResponseChannel};

pub(super) type SyllabifiedText = String<SYLLABIFY_TEXT_BYTES>;

#[derive(Clone, Debug)]
pub(super) struct SyllabifyResponse {
    pub ticket: SyllabifyTicket,
    pub result: Result<SyllabifiedText, UpstreamError>,
}

/// Stand-in for the remote syllabify service: bundled sentences only.
const SYLLABIFIED: [(&str, &str); 3] = [
    ("To jest kot.", "TO JEST KOT."),
    ("Mama ma kota.", "MA·MA MA KO·TA."),
    ("Kot pije wodę.", "KOT PI·JE WO·DĘ."),
];

const NOT_FOUND_STATUS: u16 = 404;

pub(super) fn lookup(text: &str) -> Result<SyllabifiedText, UpstreamError> {
    let text = text.trim();
    let (_, syllabified) = SYLLABIFIED
        .iter()
        .find(|(plain, _)| plain.eq_ignore_ascii_case(text))
        .ok_or(UpstreamError::Service(NOT_FOUND_STATUS))?;

    let mut out = SyllabifiedText::new();
    out.push_str(syllabified)
        .map_err(|_| UpstreamError::InvalidResponse)?;
    Ok(out)
}

/// Hand a request to the service without waiting. A request the service has
/// not picked up yet is replaced; its page visit is already over.
pub(super) fn submit(requests: &RequestSignal, request: SyllabifyRequest) {
    if requests.signaled() {
        debug!(
            "syllabify: replacing untaken request with page={} serial={}",
            request.ticket.page, request.ticket.serial
        );
    }
    requests.signal(request);
}

/// Answer requests one at a time after `latency`; a reply slower than
/// `timeout` is reported as a timeout.
pub(super) async fn serve(
    requests: &RequestSignal,
    responses: &ResponseChannel,
    latency: Duration,
    timeout: Duration,
) -> ! {
    info!(
        "syllabify: stand-in ready latency_ms={} timeout_ms={}",
        latency.as_millis(),
        timeout.as_millis()
    );

    loop {
        let request = requests.wait().await;
        debug!(
            "syllabify: serving page={} serial={} text={:?}",
            request.ticket.page,
            request.ticket.serial,
            request.text.as_str()
        );

        let result = match select(Timer::after(latency), Timer::after(timeout)).await {
            Either::First(()) => lookup(&request.text),
            Either::Second(()) => Err(UpstreamError::Timeout),
        };
        if let Err(err) = result {
            info!(
                "syllabify: page={} failed: {:?}",
                request.ticket.page.saturating_add(1),
                err
            );
        }

        responses
            .send(SyllabifyResponse {
                ticket: request.ticket,
                result,
            })
            .await;
    }
}
