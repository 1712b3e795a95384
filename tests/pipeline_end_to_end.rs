use maskmatch::{
    locate_best_match, CancelToken, CandidateLog, LocateConfig, Locator, Mask, MaskMatchError,
    MaskedTemplate, MatchOutcome, Metric, NoopObserver, OwnedImage, Rect, ScaleObserver,
    ScaleRange, ScaleReport, Template,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WHITE: &[u8] = &[255, 255, 255];
const BLACK: &[u8] = &[0, 0, 0];

fn paint(image: &mut OwnedImage, x0: usize, y0: usize, width: usize, height: usize, px: &[u8]) {
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            image.put_pixel(x, y, px);
        }
    }
}

fn canvas(width: usize, height: usize, blocks: &[(usize, usize, usize, &[u8])]) -> OwnedImage {
    let mut image = OwnedImage::filled(width, height, BLACK).unwrap();
    for &(x, y, size, px) in blocks {
        paint(&mut image, x, y, size, size, px);
    }
    image
}

fn solid_template(size: usize, px: &[u8]) -> Template {
    Template::from_image(OwnedImage::filled(size, size, px).unwrap())
}

fn expect_found(outcome: MatchOutcome) -> maskmatch::BestMatch {
    match outcome {
        MatchOutcome::Found(best) => best,
        MatchOutcome::NoFeasibleScale => panic!("expected a match"),
    }
}

#[test]
fn exact_square_is_found_with_zero_score() {
    let image = canvas(10, 10, &[(3, 3, 4, WHITE)]);
    let template = solid_template(4, WHITE);

    let best = expect_found(locate_best_match(image.view(), &template, 4, 5, 10).unwrap());
    assert_eq!(best.score, 0.0);
    assert_eq!(best.rect, Rect::new(3, 3, 4, 4));
    assert_eq!(best.scale, 4);
    assert_eq!(best.working_scale, 1.0);
    assert_eq!(best.source_rect(), best.rect);
}

fn corner_masked_pair() -> MaskedTemplate {
    let template = OwnedImage::filled(4, 4, WHITE).unwrap();
    let mut mask = OwnedImage::filled(4, 4, &[1, 1, 1]).unwrap();
    paint(&mut mask, 0, 0, 2, 2, &[0, 0, 0]);
    MaskedTemplate::new(template, Mask::new(mask).unwrap()).unwrap()
}

#[test]
fn masked_out_region_is_ignored() {
    let image = canvas(10, 10, &[(3, 3, 4, WHITE)]);
    let cfg = LocateConfig {
        working_dimension: 10,
        min_size: 4,
        max_size: 5,
        ..LocateConfig::default()
    };
    let locator = Locator::from_masked(corner_masked_pair()).with_config(cfg);
    let clean = locator.locate(image.view()).unwrap();

    let mut corrupted = image.clone();
    paint(&mut corrupted, 3, 3, 2, 2, BLACK);
    let dirty = locator.locate(corrupted.view()).unwrap();

    assert_eq!(clean, dirty);
    let best = expect_found(dirty);
    assert_eq!(best.rect, Rect::new(3, 3, 4, 4));
    // Four masked-out template pixels still contribute 255^2 per channel.
    assert_eq!(best.score, (4.0 * 3.0 * 255.0 * 255.0) / 16.0);
}

#[test]
fn l2_metric_divides_the_norm_by_the_pixel_count() {
    let image = canvas(10, 10, &[(3, 3, 4, WHITE)]);
    let base = Locator::from_masked(corner_masked_pair()).with_config(LocateConfig {
        working_dimension: 10,
        min_size: 4,
        max_size: 5,
        ..LocateConfig::default()
    });
    assert_eq!(base.config().metric, Metric::SumSquared);
    assert_eq!(base.template().mask().included_pixels(), 12);

    let l2 = Locator::from_masked(base.template().clone()).with_config(LocateConfig {
        metric: Metric::L2Norm,
        ..base.config().clone()
    });
    let sse_best = expect_found(base.locate(image.view()).unwrap());
    let l2_best = expect_found(l2.locate(image.view()).unwrap());

    assert_eq!(l2_best.rect, sse_best.rect);
    assert_eq!(l2_best.scale, sse_best.scale);
    assert_eq!(l2_best.score, (4.0f64 * 3.0 * 255.0 * 255.0).sqrt() / 16.0);
}

#[test]
fn templates_larger_than_the_image_yield_no_match() {
    let image = canvas(10, 10, &[(3, 3, 4, WHITE)]);
    let template = solid_template(4, WHITE);

    let outcome = locate_best_match(image.view(), &template, 11, 15, 10).unwrap();
    assert_eq!(outcome, MatchOutcome::NoFeasibleScale);
    assert!(!outcome.is_found());
    assert!(outcome.best().is_none());
}

#[test]
fn ties_keep_the_smallest_scale() {
    let image = canvas(20, 20, &[(2, 2, 2, WHITE), (12, 12, 3, WHITE)]);
    let template = solid_template(2, WHITE);
    let locator = Locator::new(&template).with_config(LocateConfig {
        working_dimension: 20,
        min_size: 2,
        max_size: 4,
        ..LocateConfig::default()
    });

    let mut log = CandidateLog::default();
    let best = expect_found(locator.locate_with_observer(image.view(), &mut log).unwrap());
    assert_eq!(best.scale, 2);
    assert_eq!(best.rect, Rect::new(2, 2, 2, 2));
    assert_eq!(best.score, 0.0);

    let seen: Vec<(usize, Rect, f64)> = log
        .candidates()
        .iter()
        .map(|c| (c.scale, c.rect, c.score))
        .collect();
    assert_eq!(
        seen,
        vec![
            (2, Rect::new(2, 2, 2, 2), 0.0),
            (3, Rect::new(12, 12, 3, 3), 0.0),
        ]
    );
}

#[test]
fn scan_stops_once_the_template_outgrows_the_image() {
    let image = canvas(10, 10, &[(3, 3, 4, WHITE)]);
    let template = solid_template(4, WHITE);
    let locator = Locator::new(&template).with_config(LocateConfig {
        working_dimension: 10,
        min_size: 8,
        max_size: 15,
        ..LocateConfig::default()
    });

    let mut log = CandidateLog::default();
    let outcome = locator.locate_with_observer(image.view(), &mut log).unwrap();
    assert!(outcome.is_found());
    let scales: Vec<usize> = log.candidates().iter().map(|c| c.scale).collect();
    assert_eq!(scales, vec![8, 9, 10]);
    let full = log.candidates().last().unwrap();
    assert_eq!(full.rect, Rect::new(0, 0, 10, 10));
}

#[test]
fn working_resolution_rect_maps_back_to_input() {
    let mut image = OwnedImage::filled(400, 300, BLACK).unwrap();
    paint(&mut image, 100, 60, 40, 40, WHITE);
    let template = solid_template(10, WHITE);

    let best = expect_found(locate_best_match(image.view(), &template, 20, 21, 200).unwrap());
    assert_eq!(best.working_scale, 0.5);
    assert_eq!(best.score, 0.0);
    assert_eq!(best.rect, Rect::new(50, 30, 20, 20));
    assert_eq!(best.source_rect(), Rect::new(100, 60, 40, 40));

    let best = expect_found(locate_best_match(image.view(), &template, 18, 23, 200).unwrap());
    assert_eq!(best.scale, 18);
    assert_eq!(best.rect, Rect::new(50, 30, 18, 18));
}

#[test]
fn normalized_scores_compare_across_scales() {
    let gray: &[u8] = &[200, 200, 200];
    let block: &[u8] = &[220, 220, 220];
    let template = solid_template(10, gray);

    let small = canvas(30, 30, &[(10, 10, 10, block)]);
    let large = canvas(60, 60, &[(20, 20, 20, block)]);

    let small_best = expect_found(locate_best_match(small.view(), &template, 10, 11, 30).unwrap());
    let large_best = expect_found(locate_best_match(large.view(), &template, 20, 21, 60).unwrap());

    assert_eq!(small_best.rect, Rect::new(10, 10, 10, 10));
    assert_eq!(large_best.rect, Rect::new(20, 20, 20, 20));
    assert_eq!(small_best.score, 1200.0);
    assert_eq!(large_best.score, small_best.score);
}

#[test]
fn irregular_template_is_found_on_clutter() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = vec![0u8; 40 * 30 * 3];
    for value in data.iter_mut() {
        *value = rng.random_range(0..=255);
    }
    let mut image = OwnedImage::new(data, 40, 30, 3).unwrap();

    // Crescent-like blob on a black background.
    let blob = [(2, 0), (3, 0), (4, 0), (1, 1), (2, 1), (0, 2), (1, 2), (0, 3), (1, 3), (1, 4)];
    let mut template = OwnedImage::filled(8, 6, BLACK).unwrap();
    let color: &[u8] = &[200, 30, 30];
    for &(x, y) in &blob {
        template.put_pixel(x, y, color);
        image.put_pixel(23 + x, 17 + y, color);
    }
    let template = Template::from_image(template);
    assert_eq!(template.to_masked().mask().included_pixels(), blob.len());

    let best = expect_found(locate_best_match(image.view(), &template, 8, 9, 40).unwrap());
    assert_eq!(best.rect, Rect::new(23, 17, 8, 6));
    assert_eq!(best.score, 0.0);
}

#[test]
fn repeated_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut data = vec![0u8; 64 * 48 * 3];
    for value in data.iter_mut() {
        *value = rng.random_range(0..=255);
    }
    let image = OwnedImage::new(data, 64, 48, 3).unwrap();
    let template = Template::from_image(image.view().roi(20, 10, 16, 12).unwrap().to_owned_image());
    let locator = Locator::new(&template).with_config(LocateConfig::from_fractions(32, 0.1, 0.5));

    let first = locator.locate(image.view()).unwrap();
    let second = locator.locate(image.view()).unwrap();
    assert!(first.is_found());
    assert_eq!(first, second);
}

#[test]
fn search_scales_accepts_an_explicit_range() {
    let image = canvas(20, 20, &[(5, 6, 5, WHITE)]);
    let template = solid_template(3, WHITE);
    let locator = Locator::new(&template);

    let best = expect_found(
        locator
            .search_scales(image.view(), ScaleRange::new(5, 6), 1.0, &mut CandidateLog::default())
            .unwrap(),
    );
    assert_eq!(best.rect, Rect::new(5, 6, 5, 5));

    let outcome = locator
        .search_scales(image.view(), ScaleRange::new(6, 6), 1.0, &mut CandidateLog::default())
        .unwrap();
    assert_eq!(outcome, MatchOutcome::NoFeasibleScale);
}

#[test]
fn working_image_feeds_search_scales() {
    let mut image = OwnedImage::filled(400, 300, BLACK).unwrap();
    paint(&mut image, 100, 60, 40, 40, WHITE);
    let template = solid_template(10, WHITE);
    let locator = Locator::new(&template).with_config(LocateConfig {
        working_dimension: 200,
        min_size: 18,
        max_size: 23,
        ..LocateConfig::default()
    });

    let (working, factor) = locator.working_image(image.view()).unwrap();
    assert_eq!(working.shape(), (200, 150, 3));
    assert_eq!(factor, 0.5);

    let scales = ScaleRange::from_config(locator.config());
    let staged = locator
        .search_scales(working.view(), scales, factor, &mut NoopObserver)
        .unwrap();
    assert_eq!(staged, locator.locate(image.view()).unwrap());
    assert_eq!(expect_found(staged).source_rect(), Rect::new(100, 60, 36, 36));

    let bad = Locator::new(&template).with_config(LocateConfig {
        working_dimension: 0,
        ..LocateConfig::default()
    });
    assert!(matches!(
        bad.working_image(image.view()).err().unwrap(),
        MaskMatchError::InvalidInput(_)
    ));
}

struct CancelAfterFirst {
    token: CancelToken,
    calls: usize,
}

impl ScaleObserver for CancelAfterFirst {
    fn on_scale(&mut self, _report: &ScaleReport<'_>) {
        self.calls += 1;
        self.token.cancel();
    }
}

#[test]
fn cancellation_stops_before_the_next_scale() {
    let image = canvas(20, 20, &[(3, 3, 4, WHITE)]);
    let template = solid_template(4, WHITE);
    let cfg = LocateConfig {
        working_dimension: 20,
        min_size: 2,
        max_size: 10,
        ..LocateConfig::default()
    };

    let token = CancelToken::new();
    token.cancel();
    let locator = Locator::new(&template)
        .with_config(cfg.clone())
        .with_cancel_token(token);
    assert_eq!(
        locator.locate(image.view()).err().unwrap(),
        MaskMatchError::Cancelled
    );

    let token = CancelToken::new();
    let locator = Locator::new(&template)
        .with_config(cfg)
        .with_cancel_token(token.clone());
    let mut observer = CancelAfterFirst { token, calls: 0 };
    let err = locator
        .locate_with_observer(image.view(), &mut observer)
        .err()
        .unwrap();
    assert_eq!(err, MaskMatchError::Cancelled);
    assert_eq!(observer.calls, 1);
}

#[test]
fn invalid_inputs_are_rejected() {
    let template = solid_template(4, WHITE);
    let gray = OwnedImage::filled(10, 10, &[0]).unwrap();
    let err = locate_best_match(gray.view(), &template, 4, 5, 10)
        .err()
        .unwrap();
    assert!(matches!(err, MaskMatchError::ShapeMismatch { .. }));

    let image = canvas(10, 10, &[]);
    let err = locate_best_match(image.view(), &template, 0, 5, 10)
        .err()
        .unwrap();
    assert!(matches!(err, MaskMatchError::InvalidInput(_)));
    let err = locate_best_match(image.view(), &template, 4, 5, 0)
        .err()
        .unwrap();
    assert!(matches!(err, MaskMatchError::InvalidInput(_)));
}
