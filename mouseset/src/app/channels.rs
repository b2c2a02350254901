use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use core_foundation_sys::runloop::{
    CFRunLoopGetMain, CFRunLoopSourceRef, CFRunLoopSourceSignal, CFRunLoopWakeUp,
};
use tokio::sync::mpsc;

use crate::ipc::IpcServer;
use crate::macos::MouseSample;
use mouseset_ipc::{Command, Response};

pub type IpcCommandWithResponse = (Command, mpsc::Sender<Response>);

pub struct TokioChannels {
    pub ipc_cmd_tx: std_mpsc::Sender<IpcCommandWithResponse>,
    pub server_tx: mpsc::Sender<IpcCommandWithResponse>,
    pub server_rx: mpsc::Receiver<IpcCommandWithResponse>,
    pub wake_source: Arc<AtomicPtr<c_void>>,
}

pub struct MainChannels {
    pub ipc_cmd_rx: std_mpsc::Receiver<IpcCommandWithResponse>,
    pub hotkey_cmd_tx: std_mpsc::Sender<Command>,
    pub hotkey_cmd_rx: std_mpsc::Receiver<Command>,
    pub mouse_tx: std_mpsc::Sender<MouseSample>,
    pub mouse_rx: std_mpsc::Receiver<MouseSample>,
    pub wake_source: Arc<AtomicPtr<c_void>>,
}

pub fn create_channels() -> (TokioChannels, MainChannels) {
    // Channel: IPC commands (tokio -> main thread)
    let (ipc_cmd_tx, ipc_cmd_rx) = std_mpsc::channel::<IpcCommandWithResponse>();

    // Channel for IPC server (tokio internal)
    let (server_tx, server_rx) = mpsc::channel::<IpcCommandWithResponse>(64);

    // Channel: hotkey tap -> main thread
    let (hotkey_cmd_tx, hotkey_cmd_rx) = std_mpsc::channel::<Command>();

    // Channel: mouse tap -> main thread
    let (mouse_tx, mouse_rx) = std_mpsc::channel::<MouseSample>();

    // Main-thread CFRunLoopSource, published once the run loop context exists
    let wake_source = Arc::new(AtomicPtr::new(ptr::null_mut()));

    let tokio_channels = TokioChannels {
        ipc_cmd_tx,
        server_tx,
        server_rx,
        wake_source: Arc::clone(&wake_source),
    };

    let main_channels = MainChannels {
        ipc_cmd_rx,
        hotkey_cmd_tx,
        hotkey_cmd_rx,
        mouse_tx,
        mouse_rx,
        wake_source,
    };

    (tokio_channels, main_channels)
}

pub async fn run_async(channels: TokioChannels) {
    let TokioChannels {
        ipc_cmd_tx,
        server_tx,
        server_rx: mut ipc_rx,
        wake_source,
    } = channels;

    tracing::info!("Tokio runtime started");

    let ipc_server = IpcServer::new(server_tx);
    tokio::spawn(async move {
        if let Err(e) = ipc_server.run().await {
            tracing::error!("IPC server error: {}", e);
        }
    });

    while let Some((cmd, resp_tx)) = ipc_rx.recv().await {
        // Forward IPC commands to main thread
        if ipc_cmd_tx.send((cmd, resp_tx)).is_err() {
            tracing::error!("Failed to forward IPC command to main thread");
            break;
        }
        let source = wake_source.load(Ordering::Acquire);
        if !source.is_null() {
            unsafe {
                CFRunLoopSourceSignal(source as CFRunLoopSourceRef);
                CFRunLoopWakeUp(CFRunLoopGetMain());
            }
        }
    }

    tracing::info!("Tokio runtime exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_source_shared_and_unset() {
        let (tokio_channels, main_channels) = create_channels();
        assert!(Arc::ptr_eq(
            &tokio_channels.wake_source,
            &main_channels.wake_source
        ));
        assert!(tokio_channels.wake_source.load(Ordering::Acquire).is_null());

        let marker = 0x1000 as *mut c_void;
        main_channels.wake_source.store(marker, Ordering::Release);
        assert_eq!(tokio_channels.wake_source.load(Ordering::Acquire), marker);
    }

    #[test]
    fn test_forwarded_commands_keep_order() {
        let (tokio_channels, main_channels) = create_channels();
        let (resp_tx, _resp_rx) = mpsc::channel(1);
        tokio_channels
            .ipc_cmd_tx
            .send((Command::Save, resp_tx.clone()))
            .unwrap();
        tokio_channels
            .ipc_cmd_tx
            .send((Command::Restore, resp_tx))
            .unwrap();

        let received: Vec<Command> = main_channels
            .ipc_cmd_rx
            .try_iter()
            .map(|(cmd, _)| cmd)
            .collect();
        assert_eq!(received, vec![Command::Save, Command::Restore]);
    }
}
