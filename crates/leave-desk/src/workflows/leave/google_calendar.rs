use google_calendar3::api::{Event, EventDateTime};
use google_calendar3::CalendarHub;
use tokio::runtime::Runtime;

use super::calendar::{AllDayEvent, CalendarError, CalendarGateway};

/// Thin wrapper around the generated google-calendar3 client allowing the
/// synchronous intake pipeline to create events without exposing async details.
pub struct GoogleCalendarClient<C>
where
    C: google_calendar3::common::Connector + Send + Sync + 'static,
{
    hub: CalendarHub<C>,
    runtime: Runtime,
    calendar_id: String,
}

impl<C> GoogleCalendarClient<C>
where
    C: google_calendar3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: CalendarHub<C>, runtime: Runtime, calendar_id: impl Into<String>) -> Self {
        Self {
            hub,
            runtime,
            calendar_id: calendar_id.into(),
        }
    }

    pub fn with_runtime(
        hub: CalendarHub<C>,
        calendar_id: impl Into<String>,
    ) -> Result<Self, CalendarError> {
        let runtime = Runtime::new().map_err(|err| CalendarError::Runtime(err.to_string()))?;
        Ok(Self::new(hub, runtime, calendar_id))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> CalendarError {
        CalendarError::Backend(err.to_string())
    }
}

impl<C> std::fmt::Debug for GoogleCalendarClient<C>
where
    C: google_calendar3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarClient")
            .field("calendar_id", &self.calendar_id)
            .finish_non_exhaustive()
    }
}

impl<C> CalendarGateway for GoogleCalendarClient<C>
where
    C: google_calendar3::common::Connector + Send + Sync + 'static,
{
    fn create_all_day_event(&self, event: &AllDayEvent) -> Result<String, CalendarError> {
        if self.calendar_id.trim().is_empty() {
            return Err(CalendarError::CalendarNotFound(self.calendar_id.clone()));
        }

        let request = to_calendar_event(event);
        let result = self.runtime.block_on(async {
            self.hub
                .events()
                .insert(request, &self.calendar_id)
                .doit()
                .await
        });

        let (_, created) = result.map_err(GoogleCalendarClient::<C>::map_error)?;
        Ok(created.id.unwrap_or_default())
    }
}

/// Maps an all-day event onto the Calendar API shape; date-only start/end, busy.
pub(crate) fn to_calendar_event(event: &AllDayEvent) -> Event {
    Event {
        summary: Some(event.title.clone()),
        description: Some(event.description.clone()),
        location: Some(event.location.clone()),
        start: Some(EventDateTime {
            date: Some(event.start),
            ..EventDateTime::default()
        }),
        end: Some(EventDateTime {
            date: Some(event.end_exclusive),
            ..EventDateTime::default()
        }),
        transparency: Some("opaque".to_string()),
        visibility: Some("default".to_string()),
        ..Event::default()
    }
}
