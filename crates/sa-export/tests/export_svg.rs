//! Integration tests: scene JSON + static SVG → animated SVG (sa-export ↔ sa-core).

use pretty_assertions::assert_eq;
use sa_core::{AnimationDescriptor, Scene};
use sa_export::{ExportMode, ExportOptions, render_css_animated_svg, render_smil_animated_svg};

const STATIC_SVG: &str = include_str!("fixtures/static.svg");

fn load() -> (Vec<AnimationDescriptor>, ExportOptions) {
    let scene = Scene::from_json(include_str!("fixtures/scene.json")).unwrap();
    let options = ExportOptions::for_scene(&scene);
    (scene.animation_list(), options)
}

fn css() -> String {
    let (animations, options) = load();
    render_css_animated_svg(STATIC_SVG, &animations, &options).unwrap()
}

fn smil() -> String {
    let (animations, options) = load();
    render_smil_animated_svg(STATIC_SVG, &animations, &options).unwrap()
}

// ─── Static output ──────────────────────────────────────────────────────

#[test]
fn no_animations_returns_cleaned_svg() {
    let (_, options) = load();
    for mode in [ExportMode::Css, ExportMode::Smil] {
        let once = mode.render(STATIC_SVG, &[], &options).unwrap();
        assert!(!once.contains("data-"));
        assert!(!once.contains("SVGID_"));
        assert!(once.contains(r#"<linearGradient id="sa-gradient-1""#));
        assert!(!once.contains("<animate"));
        assert!(!once.contains("Generator"));
        let twice = mode.render(&once, &[], &options).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn zero_duration_returns_cleaned_svg() {
    let (animations, options) = load();
    let out = render_css_animated_svg(STATIC_SVG, &animations, &options.with_total_duration(0.0)).unwrap();
    assert!(!out.contains("@keyframes"));
    assert!(out.contains(r#"<g class="rect_1" transform="matrix(1 0 0 1 30 40)">"#));
}

#[test]
fn re_export_drops_previous_output() {
    let first = css();
    let (_, options) = load();
    let again = render_css_animated_svg(&first, &[], &options).unwrap();
    assert!(!again.contains("sa-animation-style"));
    assert!(!again.contains("Generator"));
}

#[test]
fn malformed_svg_is_an_error() {
    let (animations, options) = load();
    assert!(render_css_animated_svg("<svg><g></svg>", &animations, &options).is_err());
    assert!(render_smil_animated_svg("", &animations, &options).is_err());
}

// ─── CSS ────────────────────────────────────────────────────────────────

#[test]
fn css_embeds_generated_style() {
    let out = css();
    assert!(out.contains(&format!(
        "<!-- Generator: SVG Animator {} -->",
        env!("CARGO_PKG_VERSION")
    )));
    assert!(out.contains(r#"<style id="sa-animation-style">"#));
    assert!(!out.contains('\n'));
    assert!(!out.contains("data-"));
}

#[test]
fn css_animates_translation_wrapper() {
    let out = css();
    assert!(out.contains(".rect_1-left{animation:rect_1-left 3s linear 0s infinite alternate both}"));
    assert!(out.contains(
        "@keyframes rect_1-left{0%{transform:translateX(10px);animation-timing-function:cubic-bezier(0.55,0.085,0.68,0.53)}\
         66.6667%{transform:translateX(50px)}100%{transform:translateX(50px)}}"
    ));
    // static seeds come from data-transform
    assert!(out.contains(r#"<g class="rect_1-top" style="transform:translateY(20px)"><g class="rect_1-left" style="transform:translateX(10px)">"#));
}

#[test]
fn css_width_carries_origin_companion() {
    let out = css();
    assert!(out.contains("@keyframes rect_1{0%{width:40px;x:0px}66.6667%{width:80px;x:0px}100%{width:80px;x:0px}}"));
    assert!(out.contains(r#"<rect x="0" y="0" width="40" height="20""#));
}

#[test]
fn css_polygon_becomes_path() {
    let out = css();
    assert!(out.contains(r#"d="M 0 0 L 10 0 L 10 10 Z""#));
    assert!(!out.contains("<polygon"));
    assert!(out.contains(r#"@keyframes poly_1{0%{d:path("M 0 0 L 10 0 L 10 10 Z")}"#));
    assert!(out.contains(r#"100%{d:path("M 0 0 L 20 0 L 20 20 Z")}"#));
    // no data-transform: seeds come from the matrix
    assert!(out.contains(r#"<g class="poly_1-top" style="transform:translateY(50px)">"#));
}

#[test]
fn css_fill_into_gradient_animates_stops() {
    let out = css();
    assert!(out.contains(r#"<linearGradient id="sa-gradient-rect_1-fill""#));
    assert!(out.contains(r#"fill: url(#sa-gradient-rect_1-fill)"#));
    assert!(out.contains("#sa-gradient-rect_1-fill stop:nth-child(2){animation:sa-gradient-rect_1-fill-stop-2 3s"));
    assert!(out.contains(
        "@keyframes sa-gradient-rect_1-fill-stop-2{0%{stop-color:rgb(255,0,0);stop-opacity:0.5}\
         16.6667%{stop-color:rgb(255,0,0);stop-opacity:0.5}50%{stop-color:rgb(0,0,255);stop-opacity:1}\
         100%{stop-color:rgb(0,0,255);stop-opacity:1}}"
    ));
}

#[test]
fn css_preserve_aspect_ratio() {
    let (animations, options) = load();
    let options = options.with_preserve_aspect_ratio("xMidYMid slice");
    let out = render_css_animated_svg(STATIC_SVG, &animations, &options).unwrap();
    assert!(out.contains(r#"preserveAspectRatio="xMidYMid slice""#));
}

// ─── SMIL ───────────────────────────────────────────────────────────────

#[test]
fn smil_animates_translation_wrapper() {
    let out = smil();
    assert!(out.contains(
        r#"<g class="rect_1-left"><animateTransform attributeName="transform" attributeType="XML" type="translate" values="10 0;50 0;50 0" keyTimes="0;0.6667;1" calcMode="spline" keySplines="0.55 0.085 0.68 0.53;0 0 1 1" dur="3s" repeatCount="indefinite" fill="freeze" additive="sum"/>"#
    ));
    assert!(out.contains(r#"<g class="rect_1-top" transform="translate(0 20)">"#));
    assert!(!out.contains("<style"));
}

#[test]
fn smil_animates_points_directly() {
    let out = smil();
    assert!(out.contains("<polygon"));
    assert!(out.contains(
        r#"<animate attributeName="points" values="0,0 10,0 10,10;0,0 10,0 10,10;0,0 20,0 20,20" keyTimes="0;0.3333;1""#
    ));
}

#[test]
fn smil_animates_gradient_stops() {
    let out = smil();
    assert!(out.contains(
        r#"<animate attributeName="stop-color" values="rgb(255,0,0);rgb(255,0,0);rgb(0,0,255);rgb(0,0,255)""#
    ));
    assert!(out.contains(r#"<animate attributeName="stop-opacity" values="0.5;0.5;1;1""#));
    assert!(!out.contains(r#"attributeName="gradientTransform""#));
}

#[test]
fn smil_without_animations_has_no_animate() {
    let (_, options) = load();
    let out = render_smil_animated_svg(STATIC_SVG, &[], &options).unwrap();
    assert!(!out.contains("<animate"));
}

// ─── Hand-built descriptors ─────────────────────────────────────────────

fn descriptor(json: &str) -> AnimationDescriptor {
    serde_json::from_str(json).unwrap()
}

#[test]
fn left_over_two_seconds() {
    let d = descriptor(
        r#"{"id":"slide","type":"rect","properties":[{"id":"left","transitions":[
            {"property":"left","second":0,"value":10},{"property":"left","second":2,"value":50}]}]}"#,
    );
    let svg = r#"<svg><g class="slide"><rect x="-5" y="-5" width="10" height="10"/></g></svg>"#;
    let options = ExportOptions::default().with_total_duration(2.0);
    let out = render_css_animated_svg(svg, &[d], &options).unwrap();
    assert!(out.contains("@keyframes slide-left{0%{transform:translateX(10px)}100%{transform:translateX(50px)}}"));
    // center origin keeps the centered geometry
    assert!(out.contains(r#"<rect x="-5" y="-5" width="10" height="10" class="slide-shape"/>"#));
}

#[test]
fn polyline_path_stays_open() {
    let d = descriptor(
        r#"{"id":"zigzag","type":"polyline","properties":[{"id":"points","transitions":[
            {"property":"points","second":0,"value":"0,0 10,0 10,10"},
            {"property":"points","second":1,"value":"0,0 5,5 10,10"}]}]}"#,
    );
    let svg = r#"<svg><g class="zigzag"><polyline points="0,0 10,0 10,10"/></g></svg>"#;
    let options = ExportOptions::default().with_total_duration(1.0);
    let out = render_css_animated_svg(svg, &[d], &options).unwrap();
    assert!(out.contains(r#"<path class="zigzag-shape" d="M 0 0 L 10 0 L 10 10"/>"#));
    assert!(out.contains(r#"100%{d:path("M 0 0 L 5 5 L 10 10")}"#));
}

#[test]
fn smil_gradient_rotation_resets_vector() {
    let d = descriptor(
        r#"{"id":"spin","type":"rect","properties":[{"id":"fill","transitions":[
            {"property":"fill","second":0,"value":"GRADIENT;linear;0;rgb(255,0,0)_0;rgb(0,0,255)_1"},
            {"property":"fill","second":1,"value":"GRADIENT;linear;90;rgb(255,0,0)_0;rgb(0,0,255)_1"}]}]}"#,
    );
    let svg = r#"<svg><g class="spin"><rect width="10" height="10" fill="red"/></g></svg>"#;
    let options = ExportOptions::default().with_total_duration(1.0);
    let out = render_smil_animated_svg(svg, &[d], &options).unwrap();
    assert!(out.contains(r#"<defs><linearGradient id="sa-gradient-spin-fill" x1="0" y1="0.5" x2="1" y2="0.5""#));
    assert!(out.contains(r#"gradientUnits="objectBoundingBox""#));
    assert!(out.contains(
        r#"<animateTransform attributeName="gradientTransform" attributeType="XML" type="rotate" values="0 0.5 0.5;90 0.5 0.5""#
    ));
    assert!(out.contains(r#"fill="url(#sa-gradient-spin-fill)""#));
}

#[test]
fn shortened_duration_ends_on_latest_keyframe() {
    let d = descriptor(
        r#"{"id":"c","type":"rect","properties":[
            {"id":"left","transitions":[
                {"property":"left","second":0,"value":0},{"property":"left","second":4,"value":10}]},
            {"id":"opacity","transitions":[{"property":"opacity","second":3,"value":0.2}]}]}"#,
    );
    let svg = r#"<svg><g class="c"><rect width="10" height="10"/></g></svg>"#;
    let options = ExportOptions::default().with_total_duration(2.0);

    let css = render_css_animated_svg(svg, std::slice::from_ref(&d), &options).unwrap();
    assert!(css.contains("@keyframes c-left{0%{transform:translateX(0px)}100%{transform:translateX(10px)}}"));
    assert!(css.contains("@keyframes c{0%{opacity:0.2}100%{opacity:0.2}}"));

    let smil = render_smil_animated_svg(svg, &[d], &options).unwrap();
    assert!(smil.contains(r#"values="0 0;10 0""#));
    assert!(smil.contains(r#"<animate attributeName="opacity" values="0.2;0.2""#));
}

#[test]
fn wrapper_without_drawable_keeps_transforms_only() {
    let d = descriptor(
        r#"{"id":"hollow","type":"rect","properties":[
            {"id":"left","transitions":[
                {"property":"left","second":0,"value":0},{"property":"left","second":1,"value":10}]},
            {"id":"opacity","transitions":[
                {"property":"opacity","second":0,"value":1},{"property":"opacity","second":1,"value":0}]}]}"#,
    );
    let svg = r#"<svg><g class="hollow"><g/></g></svg>"#;
    let options = ExportOptions::default().with_total_duration(1.0);

    let css = render_css_animated_svg(svg, std::slice::from_ref(&d), &options).unwrap();
    assert!(css.contains("@keyframes hollow-left{"));
    assert!(!css.contains("@keyframes hollow{"));
    assert!(!css.contains(".hollow-shape"));

    let smil = render_smil_animated_svg(svg, &[d], &options).unwrap();
    assert!(smil.contains(r#"type="translate" values="0 0;10 0""#));
    assert!(!smil.contains(r#"attributeName="opacity""#));
}
