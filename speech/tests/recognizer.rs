//! Integration tests for the command-based recognizer
//!
//! These drive a real child process (a shell standing in for a recognizer
//! engine) and verify the event stream it produces.

#[cfg(all(unix, feature = "stt"))]
mod recognizer_tests {
    use vois_core::{RecognitionEvent, SpeechRecognizer};
    use vois_speech::{CommandRecognizer, RecognizerConfig};

    fn sh_recognizer(script: &str) -> CommandRecognizer {
        CommandRecognizer::new(RecognizerConfig {
            bin: Some("/bin/sh".into()),
            model: None,
            language_flag: None,
            extra_args: vec!["-c".to_string(), script.to_string()],
        })
    }

    async fn collect(recognizer: &CommandRecognizer) -> Vec<RecognitionEvent> {
        let mut rx = recognizer.listen("en-US").await.unwrap();
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn streams_partials_and_finalizes_the_last_transcript() {
        let recognizer = sh_recognizer("echo hel; echo hello");
        assert!(recognizer.is_supported());

        let events = collect(&recognizer).await;
        assert_eq!(
            events,
            vec![
                RecognitionEvent::Partial("hel".to_string()),
                RecognitionEvent::Partial("hello".to_string()),
                RecognitionEvent::Final("hello".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn status_lines_are_filtered_from_transcripts() {
        let recognizer = sh_recognizer("echo '[engine] loading model'; echo hi");

        let events = collect(&recognizer).await;
        assert_eq!(
            events,
            vec![
                RecognitionEvent::Partial("hi".to_string()),
                RecognitionEvent::Final("hi".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn failing_engine_yields_an_error_event() {
        let recognizer = sh_recognizer("echo hel; exit 3");

        let events = collect(&recognizer).await;
        assert_eq!(
            events.first(),
            Some(&RecognitionEvent::Partial("hel".to_string()))
        );
        assert!(matches!(events.last(), Some(RecognitionEvent::Error(_))));
    }

    #[tokio::test]
    async fn silent_engine_ends_the_stream_without_a_final() {
        let recognizer = sh_recognizer("true");

        let events = collect(&recognizer).await;
        assert!(events.is_empty());
    }

    #[test]
    fn missing_binary_is_reported_as_unsupported() {
        let recognizer = CommandRecognizer::new(RecognizerConfig {
            bin: None,
            model: None,
            language_flag: None,
            extra_args: Vec::new(),
        });
        assert!(!recognizer.is_supported());
    }
}
