
use fixture::run;
use readaloud_core::session::events::SessionEvent;
use readaloud_core::session::playback::PlaybackState;

fn playback_states(events: &[SessionEvent]) -> Vec<PlaybackState> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::PlaybackChanged(status) => Some(status.state),
            _ => None,
        })
        .collect()
}

#[test]
fn play_synthesizes_and_starts_playback() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello from the reader").await;
        let events = fixture.step("/play").await;

        let states = playback_states(&events);
        assert!(states.contains(&PlaybackState::Loading));
        assert_eq!(states.last(), Some(&PlaybackState::Playing));

        let audio = fixture.audio_state();
        let audio = audio.lock().unwrap();
        assert_eq!(audio.loaded.len(), 1);
        assert!(audio.playing);
    });
}

#[test]
fn play_while_playing_pauses() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        let events = fixture.step("/play").await;
        assert_eq!(playback_states(&events), vec![PlaybackState::Paused]);
        assert!(!fixture.audio_state().lock().unwrap().playing);
    });
}

#[test]
fn resume_reuses_generated_audio() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;
        fixture.step("/pause").await;

        let events = fixture.step("/play").await;
        assert_eq!(playback_states(&events), vec![PlaybackState::Playing]);

        // Resumed from the paused sink, no second synthesis
        assert_eq!(fixture.request_count(), 1);
        assert_eq!(fixture.audio_state().lock().unwrap().loaded.len(), 1);
    });
}

#[test]
fn stop_resets_but_keeps_cached_audio() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        let events = fixture.step("/stop").await;
        assert_eq!(playback_states(&events), vec![PlaybackState::Idle]);
        assert_eq!(fixture.audio_state().lock().unwrap().stops, 1);

        // Play after stop restarts from the cached audio without a new
        // synthesis request
        let events = fixture.step("/play").await;
        assert_eq!(playback_states(&events).last(), Some(&PlaybackState::Playing));
        assert_eq!(fixture.request_count(), 1);
        assert_eq!(fixture.audio_state().lock().unwrap().loaded.len(), 2);
    });
}

#[test]
fn parameter_change_stops_playback_and_invalidates_audio() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        let events = fixture.step("/rate 0.2").await;
        assert_eq!(playback_states(&events), vec![PlaybackState::Idle]);
        assert!(!fixture.audio_state().lock().unwrap().playing);

        // The cached audio no longer matches the parameters, so play
        // must synthesize again
        fixture.step("/play").await;
        assert_eq!(fixture.request_count(), 2);
    });
}

#[test]
fn text_change_invalidates_audio_too() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("First text").await;
        fixture.step("/play").await;
        fixture.step("Second text").await;

        fixture.step("/play").await;
        assert_eq!(fixture.request_count(), 2);
        let requests = fixture.captured_requests();
        assert_eq!(requests[1].text, "Second text");
    });
}

#[test]
fn seek_clamps_into_the_track() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        // Mock duration is 3 seconds; 100 clamps to the end
        fixture.step("/seek 100").await;
        fixture.step("/seek 1.5").await;

        let audio = fixture.audio_state();
        let audio = audio.lock().unwrap();
        assert_eq!(audio.seeks, vec![3.0, 1.5]);
    });
}

#[test]
fn seek_without_known_duration_is_ignored() {
    run(|mut fixture| async move {
        fixture.audio().set_next_duration(None);
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        // No duration means no slider; the seek is dropped quietly
        let events = fixture.step("/seek 1").await;
        let errored = events.iter().any(|e| match e {
            SessionEvent::MessageAdded(m) => m.content.contains("Seek failed"),
            _ => false,
        });
        assert!(!errored);
        assert!(fixture.audio_state().lock().unwrap().seeks.is_empty());
    });
}

#[test]
fn finished_audio_transitions_to_idle() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/play").await;

        fixture.audio().finish();

        // The periodic tick notices the sink ran dry
        fixture.wait_for_playback_state(PlaybackState::Idle).await;
        assert!(!fixture.audio_state().lock().unwrap().playing);
    });
}

#[test]
fn selecting_a_preset_copies_its_tuning() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/voice preset-chipmunk").await;
        fixture.step("/play").await;

        let request = fixture.captured_requests().pop().unwrap();
        assert_eq!(request.voice, "en-US-AnaNeural");
        assert_eq!(request.rate, "+30%");
        assert_eq!(request.pitch, "+50Hz");
    });
}

#[test]
fn selecting_a_plain_voice_keeps_the_sliders() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture.step("Hello").await;
        fixture.step("/rate 0.12").await;
        fixture.step("/pitch 7").await;
        fixture.step("/voice en-US-AriaNeural").await;
        fixture.step("/play").await;

        let request = fixture.captured_requests().pop().unwrap();
        assert_eq!(request.voice, "en-US-AriaNeural");
        assert_eq!(request.rate, "+12%");
        assert_eq!(request.pitch, "+7Hz");
    });
}

#[test]
fn reset_policy_zeroes_sliders_on_plain_voice() {
    run(|mut fixture| async move {
        fixture.startup().await;
        fixture
            .update_settings(|settings| {
                settings.playback.reset_tuning_on_plain_voice = true;
            })
            .await;

        fixture.step("Hello").await;
        fixture.step("/voice preset-villain").await;
        fixture.step("/voice en-US-AriaNeural").await;
        fixture.step("/play").await;

        let request = fixture.captured_requests().pop().unwrap();
        assert_eq!(request.rate, "+0%");
        assert_eq!(request.pitch, "+0Hz");
    });
}
