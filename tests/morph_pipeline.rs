use spirograph::{
    Ease, PatternService, Playback, PlaybackEvent, Rgb, RotationCount, SpiroConfig, SvgOptions,
    Transition, Wheel, interpolate, render_svg,
};

fn black_flower() -> SpiroConfig {
    SpiroConfig::new("Flower", Wheel::fixed(100.0), Wheel::moving(50.0, 0.5))
        .with_color(Rgb::new(0, 0, 0))
}

fn white_star() -> SpiroConfig {
    SpiroConfig::new("Star", Wheel::fixed(84.0), Wheel::moving(21.0, 0.7))
        .with_color(Rgb::new(255, 255, 255))
}

#[test]
fn midpoint_color_is_mid_gray() {
    let plan = interpolate(&black_flower(), &white_star(), 2, Ease::Linear).unwrap();
    let mid = plan[1].color;
    for channel in [mid.r, mid.g, mid.b] {
        assert!((127..=129).contains(&channel));
    }
    assert_eq!(plan[1].color.to_hex(), "#808080");
}

#[test]
fn playback_walks_every_morph_frame() {
    let service = PatternService::default();
    let plan = service
        .plan_morph(&black_flower(), &white_star(), 5, "ease-out")
        .unwrap();

    let mut playback = Playback::for_morph(plan.len());
    playback.apply(PlaybackEvent::Play);

    let mut shown = vec![playback.cursor()];
    let mut completed = false;
    for transition in playback.ticks() {
        match transition {
            Transition::Advanced { cursor } => shown.push(cursor),
            Transition::Completed => completed = true,
            other => panic!("unexpected transition {other:?}"),
        }
    }
    assert!(completed);
    assert_eq!(shown, (0..plan.len()).collect::<Vec<_>>());

    for index in shown {
        let pattern = service.draw(&plan[index]).unwrap();
        assert!(!pattern.is_empty());
    }
}

#[test]
fn parallel_draw_keeps_endpoint_closure() {
    let service = PatternService::default();
    let plan = service
        .plan_morph(&black_flower(), &white_star(), 4, "linear")
        .unwrap();
    let patterns = service.draw_all(&plan, None).unwrap();

    assert_eq!(patterns.len(), 5);
    assert_eq!(patterns[0].rotation_count, 2);
    assert_eq!(patterns[4].rotation_count, 4);
    assert!(patterns[0].is_closed(1e-9));
    assert!(patterns[4].is_closed(1e-9));
}

#[test]
fn explicit_counts_are_respected_end_to_end() {
    let a = black_flower().with_rotation_count(RotationCount::count(1).unwrap());
    let b = white_star().with_rotation_count(RotationCount::count(3).unwrap());
    let plan = interpolate(&a, &b, 2, Ease::EaseInOut).unwrap();
    let patterns = PatternService::default().draw_all(&plan, Some(1)).unwrap();
    let counts: Vec<_> = patterns.iter().map(|p| p.rotation_count).collect();
    assert_eq!(counts, [1, 3, 3]);
}

#[test]
fn every_frame_exports_to_svg() {
    let service = PatternService::default();
    let plan = service
        .plan_morph(&black_flower(), &white_star(), 3, "ease-in")
        .unwrap();
    for frame in service.frames(&plan) {
        let frame = frame.unwrap();
        let config = &plan[frame.index];
        let svg = render_svg(&frame.pattern, config, &SvgOptions::default()).unwrap();
        assert!(svg.contains(&format!("stroke=\"{}\"", config.color)));
    }
}
