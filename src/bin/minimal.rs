// Minimal smoke run over a synthetic signal, no files needed

use edit_director::{
    config::{Config, Mood},
    pipeline::PipelineEngine,
    scoring::ScorerRegistry,
    selection::SelectorRegistry,
    signal::{RawSignal, SpeechInterval},
};

fn synthetic_signal() -> RawSignal {
    // 60s clip: loud first half with a quiet dip every 12s, calm second half
    let timestamps: Vec<f64> = (0..60).map(|t| t as f64).collect();
    let energy: Vec<f64> = (0..60)
        .map(|t| match t {
            t if t % 12 == 11 => 0.03,
            t if t < 30 => 0.75,
            _ => 0.3,
        })
        .collect();

    RawSignal::new("synthetic", 60.0)
        .with_audio(timestamps, energy)
        .with_speech(vec![
            SpeechInterval::with_text(13.0, 19.0, "and that is the winning goal"),
            SpeechInterval::new(40.0, 44.0),
        ])
        .with_scene_changes(vec![24.0, 36.5, 48.0])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎬 Testing Edit-Director Core Functionality");

    // Test 1: Registries
    println!("\n1. Testing Strategy Registries...");
    let scorers = ScorerRegistry::new().available_scorers();
    let selectors = SelectorRegistry::new().available_selectors();
    println!("   Scorers: {:?}", scorers);
    println!("   Selectors: {:?}", selectors);

    // Test 2: Configuration
    println!("\n2. Testing Configuration...");
    let mut config = Config::default();
    config.edit.target_duration = 20.0;
    config.edit.mood = Mood::Energetic;
    config.edit.keywords = vec!["goal".to_string()];
    config.validate()?;
    println!("   Target: {:.1}s, mood: {}", config.edit.target_duration, config.edit.mood);

    // Test 3: Full pipeline with each scorer
    let signal = synthetic_signal();
    for scorer in &scorers {
        println!("\n3. Running pipeline with {} scorer...", scorer);
        let mut run_config = config.clone();
        run_config.strategy.scorer = scorer.clone();

        let engine = PipelineEngine::from_config(run_config)?;
        let plan = engine.run(&signal)?;

        println!(
            "   Clips: {}, duration: {:.1}s, traced segments: {}",
            plan.clips.len(),
            plan.metadata.total_duration,
            plan.decision_trace.len()
        );
        for clip in &plan.clips {
            println!("      [{:5.1}s, {:5.1}s)", clip.start, clip.end);
        }

        // Test 4: Determinism
        let again = engine.run(&signal)?;
        if again != plan {
            return Err("pipeline output differs between identical runs".into());
        }
        println!("   ✅ Identical plan on re-run");
    }

    println!("\n🎉 All checks passed! Edit-Director core is working.");

    Ok(())
}
