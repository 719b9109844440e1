use pretty_assertions::assert_eq;
use test_log::test;

use super::*;
use crate::common::config::GroupSettings;
use crate::model::{ChangeState, Direction, TabbingState, UngroupState};
use crate::sys::geometry::Rect;
use crate::sys::headless::{HeadlessHost, HostRequest};
use crate::sys::host::{WindowFlags, WindowHost};

const SCREEN: Rect = Rect::new(0, 0, 1000, 800);

fn config(f: impl FnOnce(&mut GroupSettings)) -> Config {
    let mut config = Config::default();
    f(&mut config.settings);
    config
}

fn setup(config: Config, frames: &[Rect]) -> (Reactor<HeadlessHost>, Vec<WindowId>) {
    let mut host = HeadlessHost::new(vec![SCREEN]);
    let wids: Vec<WindowId> = frames.iter().map(|f| host.add_window(*f)).collect();
    let mut reactor = Reactor::with_seed(host, config, 7);
    for &wid in &wids {
        reactor.handle_event(Event::WindowCreated(wid));
    }
    (reactor, wids)
}

fn settle(reactor: &mut Reactor<HeadlessHost>) {
    for _ in 0..1000 {
        reactor.tick(16);
        let idle = reactor.registry().iter().all(|(_, g)| !g.is_animating() && !g.untab_pending);
        if idle {
            reactor.registry().check_invariants();
            return;
        }
    }
    panic!("groups did not settle");
}

fn command(reactor: &mut Reactor<HeadlessHost>, cmd: Command) {
    reactor.handle_event(Event::Command(cmd));
    reactor.registry().check_invariants();
}

fn frame(reactor: &Reactor<HeadlessHost>, wid: WindowId) -> Rect {
    reactor.host().frame(wid).expect("window exists")
}

fn bar(reactor: &Reactor<HeadlessHost>, wid: WindowId) -> &crate::model::TabBar {
    let key = reactor.registry().group_of(wid).expect("window is grouped");
    reactor.registry().get(key).and_then(|g| g.tab_bar.as_ref()).expect("group is tabbed")
}

fn order(reactor: &Reactor<HeadlessHost>, wid: WindowId) -> Vec<WindowId> {
    bar(reactor, wid).tabs().iter().map(|t| t.window).collect()
}

fn tab_onto(reactor: &mut Reactor<HeadlessHost>, main: WindowId) {
    let key = reactor.registry().group_of(main).expect("window is grouped");
    assert!(reactor.tab_group(key, main));
    settle(reactor);
}

/// Two windows grouped and tabbed onto the second one.
fn tabbed_pair() -> (Reactor<HeadlessHost>, WindowId, WindowId) {
    let (mut reactor, wids) =
        setup(Config::default(), &[Rect::new(100, 100, 200, 150), Rect::new(500, 300, 300, 200)]);
    let (a, b) = (wids[0], wids[1]);
    command(&mut reactor, Command::SelectWindow(a));
    command(&mut reactor, Command::SelectWindow(b));
    command(&mut reactor, Command::GroupSelected);
    command(&mut reactor, Command::ToggleTab(b));
    settle(&mut reactor);
    (reactor, a, b)
}

#[test]
fn tabbing_stacks_the_group_onto_the_window() {
    let (reactor, a, b) = tabbed_pair();

    let key = reactor.registry().group_of(a).unwrap();
    let group = reactor.registry().get(key).unwrap();
    assert_eq!(group.top_tab(), Some(b));
    assert_eq!(group.tabbing, TabbingState::NoTabbing);
    assert_eq!(bar(&reactor, a).region, Rect::new(547, 300, 207, 106));
    assert_eq!(order(&reactor, a), vec![a, b]);

    assert_eq!(frame(&reactor, a), Rect::new(550, 325, 200, 150));
    assert!(reactor.host().is_hidden(a));
    assert!(!reactor.host().is_hidden(b));
}

#[test]
fn untabbing_restores_the_original_layout() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::ToggleTab(b));
    let key = reactor.registry().group_of(a).unwrap();
    assert_eq!(reactor.registry().get(key).unwrap().tabbing, TabbingState::Untabbing);
    settle(&mut reactor);

    let group = reactor.registry().get(key).unwrap();
    assert!(!group.is_tabbed());
    assert_eq!(group.len(), 2);
    assert_eq!(frame(&reactor, a), Rect::new(100, 100, 200, 150));
    assert_eq!(frame(&reactor, b), Rect::new(500, 300, 300, 200));
    assert!(!reactor.host().is_hidden(a));
}

#[test]
fn changing_tabs_swaps_the_visible_window() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::ChangeTabRight(b));
    {
        let bar = bar(&reactor, a);
        assert_eq!(bar.top, Some(a));
        assert_eq!(bar.change_state, ChangeState::OldOut);
        assert_eq!(bar.direction, Direction::Right);
    }
    assert!(!reactor.host().is_hidden(a));

    settle(&mut reactor);
    let bar = bar(&reactor, a);
    assert_eq!(bar.change_state, ChangeState::NoChange);
    assert_eq!(bar.prev_top, Some(a));
    assert!(reactor.host().is_hidden(b));
    assert!(reactor.host().requests().contains(&HostRequest::Activate(a)));
}

#[test]
fn a_very_long_frame_finishes_the_tab_change() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::ChangeTabRight(b));
    reactor.tick(3_600_000);
    let bar = bar(&reactor, a);
    assert_eq!(bar.change_state, ChangeState::NoChange);
    assert_eq!(bar.top, Some(a));
    assert_eq!(bar.region, Rect::new(547, 325, 207, 106));
    assert!(reactor.host().is_hidden(b));
}

#[test]
fn ungrouping_during_a_tab_change_waits_for_it() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::ChangeTabRight(b));
    reactor.tick(16);
    command(&mut reactor, Command::Ungroup(a));

    let snapshot = reactor.snapshot();
    assert_eq!(snapshot.groups.len(), 1);
    assert_eq!(snapshot.groups[0].ungroup, UngroupState::All);
    assert_eq!(snapshot.groups[0].bar.as_ref().unwrap().change_state, ChangeState::OldOut);

    settle(&mut reactor);
    assert!(reactor.registry().is_empty());
    assert_eq!(frame(&reactor, a), Rect::new(100, 100, 200, 150));
    assert_eq!(frame(&reactor, b), Rect::new(500, 300, 300, 200));
    assert!(!reactor.host().is_hidden(a));
    assert!(!reactor.host().is_hidden(b));
}

#[test]
fn ungrouping_while_the_new_tab_comes_in_waits_for_it() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::ChangeTabRight(b));
    for _ in 0..16 {
        reactor.tick(16);
    }
    assert_eq!(bar(&reactor, a).change_state, ChangeState::NewIn);
    command(&mut reactor, Command::Ungroup(a));

    let snapshot = reactor.snapshot();
    assert_eq!(snapshot.groups[0].ungroup, UngroupState::All);
    assert_eq!(snapshot.groups[0].bar.as_ref().unwrap().change_state, ChangeState::NewIn);
    assert!(reactor.registry().iter().all(|(_, g)| g.untab_pending));

    settle(&mut reactor);
    assert!(reactor.registry().is_empty());
    assert_eq!(frame(&reactor, a), Rect::new(100, 100, 200, 150));
    assert_eq!(frame(&reactor, b), Rect::new(500, 300, 300, 200));
    assert!(!reactor.host().is_hidden(a));
    assert!(!reactor.host().is_hidden(b));
}

#[test]
fn removing_the_top_tab_hands_over_and_dissolves_the_pair() {
    let (mut reactor, a, b) = tabbed_pair();

    command(&mut reactor, Command::RemoveWindow(b));
    let key = reactor.registry().group_of(a).unwrap();
    assert_eq!(reactor.registry().get(key).unwrap().ungroup, UngroupState::Single);
    settle(&mut reactor);

    assert!(reactor.registry().is_empty());
    assert_eq!(frame(&reactor, a), Rect::new(100, 100, 200, 150));
    assert_eq!(frame(&reactor, b), Rect::new(500, 300, 300, 200));
    assert!(!reactor.host().is_hidden(a));
}

#[test]
fn untabbing_keeps_windows_on_screen() {
    let (mut reactor, wids) =
        setup(Config::default(), &[Rect::new(0, 0, 200, 200), Rect::new(400, 0, 200, 200)]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();
    tab_onto(&mut reactor, b);
    assert_eq!(frame(&reactor, a), Rect::new(400, 0, 200, 200));

    reactor.host_mut().user_move(b, -350, 0);
    reactor.handle_event(Event::WindowMoved { wid: b, dx: -350, dy: 0 });
    assert_eq!(bar(&reactor, b).region, Rect::new(47, 0, 207, 106));

    command(&mut reactor, Command::ToggleTab(b));
    let snapshot = reactor.snapshot();
    let windows = &snapshot.groups[0].windows;
    assert!(windows[&a].constraints.x);
    assert!(!windows[&b].constraints.x);

    settle(&mut reactor);
    assert_eq!(frame(&reactor, a), Rect::new(0, 0, 200, 200));
    assert_eq!(frame(&reactor, b), Rect::new(400, 0, 200, 200));
}

#[test]
fn group_follows_the_grabbed_window() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.handle_event(Event::WindowGrabbed(a));
    reactor.host_mut().user_move(a, 30, 10);
    reactor.handle_event(Event::WindowMoved { wid: a, dx: 30, dy: 10 });
    reactor.tick(16);
    assert_eq!(frame(&reactor, b), Rect::new(230, 10, 100, 100));

    // The host reports our own move back, which must not move anything.
    reactor.handle_event(Event::WindowMoved { wid: b, dx: 30, dy: 10 });
    reactor.tick(16);
    reactor.handle_event(Event::WindowUngrabbed(a));
    assert_eq!(frame(&reactor, a), Rect::new(30, 10, 100, 100));
    assert_eq!(frame(&reactor, b), Rect::new(230, 10, 100, 100));
}

#[test]
fn moves_without_a_grab_stay_local() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().user_move(a, 30, 10);
    reactor.handle_event(Event::WindowMoved { wid: a, dx: 30, dy: 10 });
    reactor.tick(16);
    assert_eq!(frame(&reactor, b), Rect::new(200, 0, 100, 100));
}

#[test]
fn activating_a_member_raises_the_group() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
        Rect::new(400, 0, 100, 100),
    ]);
    let (a, b, c) = (wids[0], wids[1], wids[2]);
    reactor.group_windows(vec![a, b, c]).unwrap();

    reactor.host_mut().activate(a);
    reactor.handle_event(Event::WindowActivated(a));
    assert_eq!(reactor.host().stacking_order(), vec![a, b, c]);
}

#[test]
fn minimizing_one_member_minimizes_the_rest_once() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().set_minimized(a, true);
    reactor.handle_event(Event::WindowMinimized(a));
    reactor.handle_event(Event::WindowMinimized(b));
    let minimized_b = reactor
        .host()
        .requests()
        .iter()
        .filter(|r| **r == HostRequest::SetMinimized(b, true))
        .count();
    assert_eq!(minimized_b, 1);
    assert!(!reactor.host().requests().contains(&HostRequest::SetMinimized(a, false)));
    assert!(reactor.host().window(b).unwrap().is_minimized());

    reactor.host_mut().set_minimized(a, false);
    reactor.handle_event(Event::WindowRestored(a));
    assert!(!reactor.host().window(b).unwrap().is_minimized());
}

#[test]
fn rubber_band_selection_groups_covered_windows() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(100, 100, 200, 150),
        Rect::new(500, 300, 300, 200),
        Rect::new(50, 600, 100, 100),
    ]);
    let (a, b, c) = (wids[0], wids[1], wids[2]);

    command(&mut reactor, Command::BeginSelection(Point::new(0, 0)));
    command(&mut reactor, Command::UpdateSelection(Point::new(850, 550)));
    let snapshot = reactor.snapshot();
    assert_eq!(snapshot.selection, Some(Rect::new(0, 0, 850, 550)));
    assert_eq!(snapshot.damage, vec![Rect::new(-5, -5, 10, 10), Rect::new(-5, -5, 860, 560)]);
    command(&mut reactor, Command::CommitSelection);
    assert_eq!(reactor.snapshot().damage, vec![Rect::new(-5, -5, 860, 560)]);
    assert_eq!(reactor.selection().selected(), &[b, a]);

    command(&mut reactor, Command::GroupSelected);
    assert!(reactor.selection().selected().is_empty());
    assert_eq!(reactor.registry().group_of(c), None);
    tab_onto(&mut reactor, a);

    let key = reactor.registry().group_of(a).unwrap();
    assert_eq!(reactor.registry().get(key).unwrap().top_tab(), Some(a));
    assert!(reactor.host().is_hidden(b));
    assert_eq!(frame(&reactor, b), Rect::new(50, 75, 300, 200));
}

#[test]
fn selecting_windows_of_a_tabbed_group_joins_it() {
    let (mut reactor, a, b) = tabbed_pair();
    let c = reactor.host_mut().add_window(Rect::new(0, 500, 100, 100));
    reactor.handle_event(Event::WindowCreated(c));

    let key = reactor.registry().group_of(a).unwrap();
    assert_eq!(reactor.group_windows(vec![b, c]).unwrap(), Some(key));
    assert_eq!(reactor.registry().len(), 1);
    assert_eq!(reactor.registry().get(key).unwrap().tabbing, TabbingState::Tabbing);
    settle(&mut reactor);

    assert_eq!(order(&reactor, a), vec![a, b, c]);
    assert_eq!(frame(&reactor, c), Rect::new(600, 350, 100, 100));
    assert!(reactor.host().is_hidden(c));
}

#[test]
fn destroying_a_window_dissolves_a_pair() {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().remove_window(a);
    reactor.handle_event(Event::WindowDestroyed(a));
    assert!(reactor.registry().is_empty());
    assert_eq!(reactor.registry().group_of(b), None);
}

#[test]
fn groups_survive_without_auto_ungroup() {
    let (mut reactor, wids) = setup(
        config(|s| s.auto_ungroup = false),
        &[Rect::new(0, 0, 100, 100), Rect::new(200, 0, 100, 100)],
    );
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().remove_window(a);
    reactor.handle_event(Event::WindowDestroyed(a));
    let key = reactor.registry().group_of(b).unwrap();
    assert_eq!(reactor.registry().get(key).unwrap().len(), 1);
}

fn tabbed_three() -> (Reactor<HeadlessHost>, [WindowId; 3]) {
    let (mut reactor, wids) = setup(Config::default(), &[
        Rect::new(0, 0, 300, 200),
        Rect::new(350, 0, 300, 200),
        Rect::new(350, 400, 300, 200),
    ]);
    reactor.group_windows(wids.clone()).unwrap();
    tab_onto(&mut reactor, wids[2]);
    (reactor, [wids[0], wids[1], wids[2]])
}

#[test]
fn clicking_a_slot_changes_the_tab() {
    let (mut reactor, [a, _, c]) = tabbed_three();
    assert_eq!(bar(&reactor, a).top, Some(c));

    let at = bar(&reactor, a).tab(a).unwrap().region.center();
    reactor.handle_event(Event::ButtonDown { button: 1, at });
    reactor.handle_event(Event::ButtonUp { button: 1, at: at.offset(1, 0) });
    assert_eq!(bar(&reactor, a).top, Some(a));
    assert_eq!(bar(&reactor, a).direction, Direction::Right);
}

#[test]
fn scrolling_over_the_bar_walks_the_tabs() {
    let (mut reactor, [a, b, c]) = tabbed_three();
    let at = bar(&reactor, a).region.center();

    reactor.handle_event(Event::ButtonDown { button: 4, at });
    assert_eq!(bar(&reactor, a).top, Some(b));
    assert_eq!(bar(&reactor, a).direction, Direction::Left);
    settle(&mut reactor);

    reactor.handle_event(Event::ButtonDown { button: 5, at });
    assert_eq!(bar(&reactor, a).top, Some(c));
}

#[test]
fn dragging_a_slot_reorders_the_bar() {
    let (mut reactor, [a, b, c]) = tabbed_three();
    assert_eq!(bar(&reactor, a).region, Rect::new(346, 400, 308, 106));

    let press = bar(&reactor, a).tab(a).unwrap().region.origin.offset(9, 15);
    reactor.handle_event(Event::ButtonDown { button: 1, at: press });
    let release = Point::new(600, press.y);
    reactor.handle_event(Event::PointerMoved(release));
    {
        let bar = bar(&reactor, a);
        assert_eq!(bar.dragged, Some(a));
        assert_eq!(bar.region, Rect::new(397, 400, 207, 106));
        assert_eq!(bar.tab(a).unwrap().region, Rect::new(591, 405, 96, 96));
    }

    reactor.handle_event(Event::ButtonUp { button: 1, at: release });
    assert_eq!(order(&reactor, a), vec![b, c, a]);
    assert_eq!(bar(&reactor, a).dragged, None);
    assert_eq!(bar(&reactor, a).region, Rect::new(346, 400, 308, 106));
    assert_eq!(bar(&reactor, a).top, Some(c));
}

#[test]
fn hovering_a_dragged_slot_brings_up_the_other_tab() {
    let (mut reactor, [a, b, _]) = tabbed_three();

    let press = bar(&reactor, a).tab(a).unwrap().region.center();
    reactor.handle_event(Event::ButtonDown { button: 1, at: press });
    reactor.handle_event(Event::PointerMoved(Point::new(600, press.y)));
    let over_b = bar(&reactor, a).tab(b).unwrap().region.center();
    reactor.handle_event(Event::PointerMoved(over_b));

    for _ in 0..40 {
        reactor.tick(16);
    }
    assert_eq!(bar(&reactor, a).top, Some(b));
}

#[test]
fn dropping_a_slot_off_the_bar_removes_its_window() {
    let (mut reactor, [a, b, c]) = tabbed_three();

    let press = bar(&reactor, a).tab(a).unwrap().region.center();
    reactor.handle_event(Event::ButtonDown { button: 1, at: press });
    reactor.handle_event(Event::PointerMoved(Point::new(100, 100)));
    reactor.handle_event(Event::ButtonUp { button: 1, at: Point::new(100, 100) });
    settle(&mut reactor);

    assert_eq!(reactor.registry().group_of(a), None);
    assert_eq!(frame(&reactor, a), Rect::new(0, 0, 300, 200));
    assert!(!reactor.host().is_hidden(a));
    assert_eq!(order(&reactor, b), vec![b, c]);
}

#[test]
fn destroying_the_top_tab_promotes_a_neighbour() {
    let (mut reactor, [a, b, c]) = tabbed_three();

    reactor.host_mut().remove_window(c);
    reactor.handle_event(Event::WindowDestroyed(c));
    let bar = bar(&reactor, a);
    assert_eq!(bar.top, Some(b));
    assert_eq!(bar.change_state, ChangeState::NoChange);
    assert!(!reactor.host().is_hidden(b));
}

#[test]
fn snapshots_key_windows_by_id() {
    let (reactor, a, b) = tabbed_pair();
    let json = serde_json::to_value(reactor.snapshot()).unwrap();
    let group = &json["groups"][0];
    assert_eq!(group["top_tab"], serde_json::json!(b.get()));
    assert_eq!(group["tabbing"], "no_tabbing");
    assert_eq!(group["windows"][a.to_string()]["hidden"], true);
    assert_eq!(group["bar"]["tabs"].as_array().map(Vec::len), Some(2));
}

#[test]
fn commands_parse_from_json() {
    let cmd: Command = serde_json::from_str(r#"{"toggle_tab": 3}"#).unwrap();
    assert_eq!(cmd, Command::ToggleTab(WindowId::new(3)));
    let cmd: Command = serde_json::from_str(r#""group_selected""#).unwrap();
    assert_eq!(cmd, Command::GroupSelected);
}

#[test]
fn new_windows_get_a_tabbed_group_of_their_own() {
    let mut host = HeadlessHost::new(vec![SCREEN]);
    let a = host.add_window(Rect::new(0, 0, 100, 100));
    let b = host.add_window(Rect::new(200, 0, 100, 100));
    let shaded = host.add_window(Rect::new(400, 0, 100, 100));
    let desktop = host.add_window(SCREEN);
    host.set_flags(shaded, WindowFlags::SHADED);
    host.set_flags(desktop, WindowFlags::DESKTOP);
    let mut reactor = Reactor::with_seed(host, config(|s| s.autotab_create = true), 7);
    for wid in [a, b, shaded, desktop] {
        reactor.handle_event(Event::WindowCreated(wid));
    }
    settle(&mut reactor);

    assert_eq!(reactor.registry().len(), 2);
    for wid in [a, b] {
        let bar = bar(&reactor, wid);
        assert_eq!(bar.top, Some(wid));
        assert_eq!(order(&reactor, wid), vec![wid]);
    }
    assert_eq!(frame(&reactor, a), Rect::new(0, 0, 100, 100));
    assert_eq!(reactor.registry().group_of(shaded), None);
    assert_eq!(reactor.registry().group_of(desktop), None);
}

#[test]
fn ungrouping_rewraps_every_window() {
    let (mut reactor, wids) = setup(config(|s| s.autotab_create = true), &[
        Rect::new(100, 100, 200, 150),
        Rect::new(500, 300, 300, 200),
    ]);
    let (a, b) = (wids[0], wids[1]);
    settle(&mut reactor);
    assert_eq!(reactor.registry().len(), 2);

    let key = reactor.group_windows(vec![a, b]).unwrap().unwrap();
    assert_eq!(reactor.registry().len(), 1);
    assert_eq!(reactor.registry().get(key).unwrap().len(), 2);
    tab_onto(&mut reactor, b);
    assert!(reactor.host().is_hidden(a));

    command(&mut reactor, Command::Ungroup(a));
    settle(&mut reactor);
    assert_eq!(reactor.registry().len(), 2);
    assert!(reactor.registry().get(key).is_none());
    for wid in [a, b] {
        assert_eq!(order(&reactor, wid), vec![wid]);
        assert!(!reactor.host().is_hidden(wid));
    }
    assert_eq!(frame(&reactor, a), Rect::new(100, 100, 200, 150));
    assert_eq!(frame(&reactor, b), Rect::new(500, 300, 300, 200));
}

#[test]
fn removing_a_window_rewraps_it_and_keeps_the_rest() {
    let (mut reactor, wids) = setup(config(|s| s.autotab_create = true), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    let key = reactor.group_windows(vec![a, b]).unwrap().unwrap();

    command(&mut reactor, Command::RemoveWindow(a));
    settle(&mut reactor);
    // b stays behind in the old group.
    assert_eq!(reactor.registry().group_of(b), Some(key));
    assert_ne!(reactor.registry().group_of(a), Some(key));
    assert_eq!(bar(&reactor, a).top, Some(a));
}

#[test]
fn resizing_a_member_resizes_the_others() {
    let (mut reactor, wids) = setup(config(|s| s.resize_all = true), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
        Rect::new(400, 0, 100, 100),
    ]);
    let (a, b, c) = (wids[0], wids[1], wids[2]);
    reactor.group_windows(vec![a, b, c]).unwrap();
    reactor.host_mut().set_flags(c, WindowFlags::MAXIMIZED);

    reactor.host_mut().user_resize(a, 20, 10);
    reactor.handle_event(Event::WindowResized { wid: a, dw: 20, dh: 10 });
    assert_eq!(frame(&reactor, b), Rect::new(200, 0, 120, 110));
    assert_eq!(frame(&reactor, c), Rect::new(400, 0, 100, 100));

    // Our own resize comes back and goes nowhere.
    reactor.handle_event(Event::WindowResized { wid: b, dw: 20, dh: 10 });
    let resizes: Vec<HostRequest> = reactor
        .host_mut()
        .take_requests()
        .into_iter()
        .filter(|r| matches!(r, HostRequest::Resize { .. }))
        .collect();
    assert_eq!(resizes, vec![HostRequest::Resize { wid: b, dw: 20, dh: 10 }]);

    reactor.host_mut().user_resize(a, -500, 0);
    reactor.handle_event(Event::WindowResized { wid: a, dw: -500, dh: 0 });
    assert_eq!(frame(&reactor, b), Rect::new(200, 0, 1, 110));
}

#[test]
fn resizes_stay_local_by_default() {
    let (mut reactor, wids) =
        setup(Config::default(), &[Rect::new(0, 0, 100, 100), Rect::new(200, 0, 100, 100)]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().user_resize(a, 20, 10);
    reactor.handle_event(Event::WindowResized { wid: a, dw: 20, dh: 10 });
    assert_eq!(frame(&reactor, b), Rect::new(200, 0, 100, 100));
}

#[test]
fn resizing_the_top_tab_moves_the_bar() {
    let (mut reactor, a, b) = tabbed_pair();
    assert_eq!(bar(&reactor, a).region, Rect::new(547, 300, 207, 106));

    // Narrower than the bar, which centers on the window.
    reactor.host_mut().user_resize(b, -150, 0);
    reactor.handle_event(Event::WindowResized { wid: b, dw: -150, dh: 0 });
    assert_eq!(bar(&reactor, a).region, Rect::new(472, 300, 207, 106));
    assert_eq!(bar(&reactor, a).tabs()[0].region, Rect::new(477, 305, 96, 96));
    assert_eq!(frame(&reactor, a), Rect::new(550, 325, 200, 150));
}

#[test]
fn maximizing_one_member_maximizes_the_rest_once() {
    let (mut reactor, wids) = setup(config(|s| s.maximize_unmaximize_all = true), &[
        Rect::new(0, 0, 100, 100),
        Rect::new(200, 0, 100, 100),
    ]);
    let (a, b) = (wids[0], wids[1]);
    reactor.group_windows(vec![a, b]).unwrap();

    reactor.host_mut().set_maximized(a, true);
    reactor.host_mut().take_requests();
    reactor.handle_event(Event::WindowMaximized(a));
    reactor.handle_event(Event::WindowMaximized(b));
    assert_eq!(reactor.host_mut().take_requests(), vec![HostRequest::SetMaximized(b, true)]);
    assert!(reactor.host().window(b).unwrap().is_maximized());

    reactor.host_mut().set_maximized(a, false);
    reactor.handle_event(Event::WindowUnmaximized(a));
    assert!(!reactor.host().window(b).unwrap().is_maximized());
}

#[test]
fn rubber_band_groups_right_away_with_auto_group() {
    let mut config = Config::default();
    config.selection.auto_group = true;
    let (mut reactor, wids) = setup(config, &[
        Rect::new(100, 100, 200, 150),
        Rect::new(500, 300, 300, 200),
        Rect::new(50, 600, 100, 100),
    ]);
    let (a, b, c) = (wids[0], wids[1], wids[2]);

    command(&mut reactor, Command::BeginSelection(Point::new(0, 0)));
    command(&mut reactor, Command::UpdateSelection(Point::new(850, 550)));
    command(&mut reactor, Command::CommitSelection);

    assert!(reactor.selection().selected().is_empty());
    let key = reactor.registry().group_of(a).unwrap();
    assert_eq!(reactor.registry().group_of(b), Some(key));
    assert_eq!(reactor.registry().group_of(c), None);
}
