use uuid::Uuid;

/// Strips leading and trailing `/` from an endpoint path. Inner separators
/// are kept as they are.
pub fn normalize_endpoint_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// `{base}/course_phase/{coursePhaseID}/{endpoint}[/{participant}]`
///
/// The base URL keeps its own path; only a trailing `/` is dropped.
pub fn build_resolution_url(
    base_url: &str,
    course_phase_id: Uuid,
    endpoint_path: &str,
    participant: Option<Uuid>,
) -> String {
    let mut url = format!(
        "{}/course_phase/{}",
        base_url.trim_end_matches('/'),
        course_phase_id
    );

    let endpoint = normalize_endpoint_path(endpoint_path);
    if !endpoint.is_empty() {
        url.push('/');
        url.push_str(endpoint);
    }

    if let Some(participant) = participant {
        url.push('/');
        url.push_str(&participant.to_string());
    }

    url
}
