//! Unit tests for the submission sequence

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::domain::{Artifact, Job, JobStatus};
    use crate::port::observer::mocks::RecordingObserver;
    use crate::port::time_provider::mocks::FakeClock;
    use crate::port::transport::mocks::{Call, ScriptedTransport};
    use crate::port::transport::MockSubmissionTransport;
    use crate::port::{TransportError, UploadReceipt};
    use std::io::Write as _;
    use std::time::Duration;

    const RULES: &str = "/*\n   YARA Rule Set\n   Author: yarGen\n*/\n\nrule sample_exe {\n  condition:\n    uint16(0) == 0x5a4d\n}\n";

    struct Harness {
        transport: Arc<ScriptedTransport>,
        clock: Arc<FakeClock>,
        observer: Arc<RecordingObserver>,
        service: SubmitService,
    }

    fn harness(transport: ScriptedTransport, config: SubmitConfig) -> Harness {
        let clock = Arc::new(FakeClock::new());
        let transport = Arc::new(transport.with_clock(clock.clone()));
        let observer = Arc::new(RecordingObserver::new());
        let service = SubmitService::new(
            config,
            transport.clone(),
            clock.clone(),
            observer.clone(),
        );
        Harness {
            transport,
            clock,
            observer,
            service,
        }
    }

    fn sample() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"MZ sample bytes").unwrap();
        f
    }

    #[test]
    fn test_missing_sample_makes_no_network_call() {
        let mut transport = MockSubmissionTransport::new();
        transport.expect_health_check().never();
        transport.expect_upload().never();

        let service = SubmitService::new(
            SubmitConfig::default(),
            Arc::new(transport),
            Arc::new(FakeClock::new()),
            Arc::new(RecordingObserver::new()),
        );

        let options = SubmitOptions::new("/definitely/not/here.exe");
        let err = service.submit(&options, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SubmitError::FileNotFound(_)));
    }

    #[test]
    fn test_unreachable_server_skips_upload() {
        let file = sample();
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_health_check()
            .times(1)
            .returning(|| Err(TransportError::Network("connection refused".to_string())));
        transport.expect_upload().never();

        let service = SubmitService::new(
            SubmitConfig::default(),
            Arc::new(transport),
            Arc::new(FakeClock::new()),
            Arc::new(RecordingObserver::new()),
        );

        let err = service
            .submit(&SubmitOptions::new(file.path()), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, SubmitError::ServerUnreachable { .. }));
        assert_eq!(
            err.to_string(),
            "yarGen server not running at http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_empty_job_id_aborts_before_generation() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("unused", &["completed"])
                .with_upload(Ok(UploadReceipt { id: String::new() })),
            SubmitConfig::default(),
        );

        let err = h
            .service
            .submit(&SubmitOptions::new(file.path()), &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, SubmitError::Upload(_)));
        assert!(!h
            .transport
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Generate(_) | Call::Status { .. })));
    }

    #[test]
    fn test_happy_path_to_stream() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("job-42", &["queued", "running", "completed"])
                .with_artifact(Ok(Artifact::new(RULES))),
            SubmitConfig::default().with_author("Florian Roth"),
        );

        let mut options = SubmitOptions::new(file.path());
        options.reference = Some("https://example.org/case/7".to_string());
        options.show_scores = true;

        let mut out = Vec::new();
        let report = h.service.submit(&options, &mut out).unwrap();

        assert_eq!(out, RULES.as_bytes());
        assert_eq!(report.job_id, "job-42");
        assert_eq!(report.bytes, RULES.len());
        assert_eq!(report.output, None);

        // Exactly two transitions for queued -> running -> completed
        assert_eq!(h.observer.transitions().len(), 2);

        let generate = h
            .transport
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Generate(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert_eq!(generate.job_id, "job-42");
        assert_eq!(generate.author, "Florian Roth");
        assert_eq!(generate.reference.as_deref(), Some("https://example.org/case/7"));
        assert!(generate.show_scores);
        assert!(!generate.exclude_opcodes);
    }

    #[test]
    fn test_call_order() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("job-1", &["completed"]),
            SubmitConfig::default(),
        );

        h.service
            .submit(&SubmitOptions::new(file.path()), &mut Vec::new())
            .unwrap();

        let calls = h.transport.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], Call::Health);
        assert!(matches!(calls[1], Call::Upload { .. }));
        assert!(matches!(calls[2], Call::Generate(_)));
        // No sleep before the first status query
        assert_eq!(
            calls[3],
            Call::Status {
                job_id: "job-1".to_string(),
                at_millis: 0
            }
        );
        assert_eq!(
            calls[4],
            Call::Fetch {
                job_id: "job-1".to_string()
            }
        );
        assert!(h.clock.sleeps().is_empty());
    }

    #[test]
    fn test_file_output_matches_stream_output() {
        let file = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yar");

        let to_file = harness(
            ScriptedTransport::new("job-1", &["running", "completed"])
                .with_artifact(Ok(Artifact::new(RULES))),
            SubmitConfig::default(),
        );
        let mut options = SubmitOptions::new(file.path());
        options.output = Some(path.clone());
        let mut untouched = Vec::new();
        let report = to_file.service.submit(&options, &mut untouched).unwrap();
        assert_eq!(report.output.as_deref(), Some(path.as_path()));
        assert!(untouched.is_empty());

        let to_stream = harness(
            ScriptedTransport::new("job-1", &["running", "completed"])
                .with_artifact(Ok(Artifact::new(RULES))),
            SubmitConfig::default(),
        );
        let mut out = Vec::new();
        to_stream
            .service
            .submit(&SubmitOptions::new(file.path()), &mut out)
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), out);
    }

    #[test]
    fn test_job_failure_surfaces_server_message() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("job-5", &[]).with_statuses(vec![
                Ok(Job::new("job-5", JobStatus::Queued)),
                Ok(Job::new("job-5", JobStatus::Failed).with_error("unsupported format")),
            ]),
            SubmitConfig::default(),
        );

        let mut out = Vec::new();
        let err = h
            .service
            .submit(&SubmitOptions::new(file.path()), &mut out)
            .unwrap_err();

        assert!(err.to_string().contains("unsupported format"));
        assert!(out.is_empty());
        assert!(!h
            .transport
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Fetch { .. })));
    }

    #[test]
    fn test_timeout_does_not_retry_upload() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("job-slow", &["running"]),
            SubmitConfig::default().with_max_wait(Duration::from_secs(2)),
        );

        let err = h
            .service
            .submit(&SubmitOptions::new(file.path()), &mut Vec::new())
            .unwrap_err();

        assert_eq!(err.to_string(), "Timeout after 2 seconds (job: job-slow)");
        let uploads = h
            .transport
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .count();
        assert_eq!(uploads, 1);
    }

    #[test]
    fn test_progress_events_in_order() {
        let file = sample();
        let h = harness(
            ScriptedTransport::new("job-3", &["running", "completed"])
                .with_artifact(Ok(Artifact::new("rule x { condition: true }"))),
            SubmitConfig::default().with_server_url("http://yargen.lan:8080"),
        );

        h.service
            .submit(&SubmitOptions::new(file.path()), &mut Vec::new())
            .unwrap();

        let events = h.observer.events();
        assert_eq!(
            events.first(),
            Some(&SubmitEvent::CheckingServer {
                server_url: "http://yargen.lan:8080".to_string()
            })
        );
        assert!(events.contains(&SubmitEvent::JobAccepted {
            job_id: "job-3".to_string()
        }));
        assert!(events.contains(&SubmitEvent::Waiting {
            max_wait: Duration::from_secs(600)
        }));
        assert_eq!(
            events.last(),
            Some(&SubmitEvent::ArtifactReady { bytes: 26 })
        );
    }
}
