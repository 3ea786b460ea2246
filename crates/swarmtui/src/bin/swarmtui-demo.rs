//! Demo: the full UI wired to a stub engine with canned transfer data.
//!
//! Run in a terminal; `q` quits, Tab cycles focus, Ctrl-L repaints.
//! Set `SWARMTUI_LOG=debug` to trace scheduling decisions to
//! `swarmtui-demo.log`.

use std::fs::File;

use swarmtui::widgets::{DownloadList, LogView, StatusBar, TitleBar};
use swarmtui::{
    DisplayManager, DownloadSnapshot, DownloadState, Error, Frame, SessionStats, SizePolicy,
    StubEngine, TerminalCanvas, TerminalSession, Timer, UiRuntime, Window, default_bindings,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let Ok(file) = File::create("swarmtui-demo.log") else {
        return;
    };
    let filter = EnvFilter::try_from_env("SWARMTUI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn canned_engine() -> StubEngine {
    let mut engine = StubEngine::new();
    engine.set_session(SessionStats {
        down_rate: 3 * 1024 * 1024,
        up_rate: 512 * 1024,
        down_total: 42 * 1024 * 1024 * 1024,
        up_total: 17 * 1024 * 1024 * 1024,
        peers: 58,
    });
    let downloads = [
        (
            "debian-13.1.0-amd64-DVD-1.iso",
            3_992_977_408u64,
            2_714_967_654u64,
            DownloadState::Downloading,
        ),
        (
            "archlinux-2026.08.01-x86_64.iso",
            1_247_805_440,
            1_247_805_440,
            DownloadState::Seeding,
        ),
        (
            "ubuntu-26.04-live-server-amd64.iso",
            2_876_123_136,
            287_612_313,
            DownloadState::Downloading,
        ),
        (
            "big-buck-bunny-2160p.mkv",
            12_884_901_888,
            0,
            DownloadState::Paused,
        ),
        (
            "fedora-workstation-44.iso",
            2_415_919_104,
            2_415_919_104,
            DownloadState::Checking,
        ),
    ];
    for (i, (name, size, done, state)) in downloads.into_iter().enumerate() {
        let downloading = state == DownloadState::Downloading;
        engine.push_download(DownloadSnapshot {
            name: name.to_owned(),
            size_bytes: size,
            done_bytes: done,
            down_rate: if downloading { (i as u64 + 1) * 700_000 } else { 0 },
            up_rate: i as u64 * 120_000,
            peers: 4 + i as u32 * 7,
            seeds: 1 + i as u32 * 2,
            state,
        });
    }
    let now = Timer::now();
    engine.push_event(now - Timer::from_minutes(3), "tracker announce ok (58 peers)");
    engine.push_event(
        now - Timer::from_seconds(40),
        "hash check started: fedora-workstation-44.iso",
    );
    engine.push_event(now, "listening on port 6881");
    engine
}

fn main() -> Result<(), Error> {
    init_logging();

    let mut manager = DisplayManager::new();
    let title = manager.push_back(Window::new(
        TitleBar::new(concat!("swarmtui ", env!("CARGO_PKG_VERSION"))),
        SizePolicy::FILL,
        SizePolicy::fixed(1),
    ));
    let list = manager.push_back(Window::new(
        DownloadList::new(),
        SizePolicy::FILL,
        SizePolicy::fill_min(1),
    ));
    let log = manager.push_back(Window::new(
        LogView::new(),
        SizePolicy::FILL,
        SizePolicy::bounded(2, 6).expect("static bounds"),
    ));
    let status = manager.push_back(Window::new(
        StatusBar::new(),
        SizePolicy::FILL,
        SizePolicy::fixed(1),
    ));
    if let Some(window) = manager.window_mut(log) {
        window.set_bottom_aligned(true);
    }
    manager.set_layout(Frame::rows(vec![
        Frame::window(title),
        Frame::window(list),
        Frame::window(log),
        Frame::window(status),
    ]));

    let engine = canned_engine();
    let mut runtime = UiRuntime::new(manager, default_bindings());

    let now = Timer::now();
    for id in [title, list, log, status] {
        runtime.activate(id, now);
    }
    runtime.set_focus(Some(list), now);
    runtime.watch(list);
    runtime.watch(log);

    let mut session = TerminalSession::enter()?;
    let mut canvas = TerminalCanvas::new();
    let result = runtime.run(&mut canvas, &engine);
    session.restore()?;
    result.map_err(Error::from)
}
